use adslot_core::{
    domain::{
        OutOfPageFormat, PixelSize, RenderEvent, SizeMapping, SlotHandle, SlotInfo, SlotSize,
    },
    host::{AdSdk, ListenerId, PrivacySettings, RenderListener, RenderPolicy, SdkError},
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, HashSet},
};

///
/// SdkCall
/// One recorded call into the fake SDK, in call order.
///

#[derive(Clone, Debug, PartialEq)]
pub enum SdkCall {
    DefineSlot {
        ad_unit_path: String,
        sizes: Vec<PixelSize>,
        container_id: String,
        handle: SlotHandle,
    },
    DefineSizeMapping(SlotHandle),
    DefineOutOfPage {
        ad_unit_path: String,
        format: OutOfPageFormat,
        handle: Option<SlotHandle>,
    },
    AddService(SlotHandle),
    Display(SlotHandle),
    Destroy(Vec<SlotHandle>),
    SetPrivacy(PrivacySettings),
    Configure(RenderPolicy),
    EnableServices,
    Refresh(Vec<SlotHandle>),
}

///
/// FakeSdk
///
/// Records every call and keeps the set of live slots the way the real tag
/// library would. Render events are only emitted when a test asks for them.
///

#[derive(Default)]
pub struct FakeSdk {
    calls: RefCell<Vec<SdkCall>>,
    slots: RefCell<BTreeMap<SlotHandle, SlotInfo>>,
    listeners: RefCell<BTreeMap<ListenerId, RenderListener>>,
    failing: RefCell<HashSet<&'static str>>,
    decline_out_of_page: Cell<bool>,
    render_on_display: Cell<Option<SlotSize>>,
    next_handle: Cell<u64>,
    next_listener: Cell<u64>,
}

impl FakeSdk {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call to `op` (e.g. `"display"`) fail.
    pub fn fail(&self, op: &'static str) {
        self.failing.borrow_mut().insert(op);
    }

    /// Answer every out-of-page request with "unsupported here".
    pub fn decline_out_of_page(&self) {
        self.decline_out_of_page.set(true);
    }

    /// Emit a render of `size` synchronously from inside every `display`.
    pub fn render_on_display(&self, size: SlotSize) {
        self.render_on_display.set(Some(size));
    }

    //
    // Inspection
    //

    #[must_use]
    pub fn calls(&self) -> Vec<SdkCall> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, pred: impl Fn(&SdkCall) -> bool) -> usize {
        self.calls.borrow().iter().filter(|call| pred(call)).count()
    }

    #[must_use]
    pub fn refresh_batches(&self) -> Vec<Vec<SlotHandle>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                SdkCall::Refresh(handles) => Some(handles.clone()),
                _ => None,
            })
            .collect()
    }

    /// Privacy settings most recently pushed.
    #[must_use]
    pub fn privacy(&self) -> Option<PrivacySettings> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            SdkCall::SetPrivacy(settings) => Some(*settings),
            _ => None,
        })
    }

    #[must_use]
    pub fn services_enabled(&self) -> bool {
        self.count(|call| matches!(call, SdkCall::EnableServices)) > 0
    }

    /// Live slots bound to `container_id`.
    #[must_use]
    pub fn live_in(&self, container_id: &str) -> Vec<SlotHandle> {
        self.slots
            .borrow()
            .values()
            .filter(|slot| slot.container_id.as_deref() == Some(container_id))
            .map(|slot| slot.handle)
            .collect()
    }

    #[must_use]
    pub fn live_out_of_page(&self) -> Vec<SlotHandle> {
        self.slots
            .borrow()
            .values()
            .filter(|slot| slot.container_id.is_none())
            .map(|slot| slot.handle)
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    //
    // Events
    //

    /// Emit a render-completion event to every listener.
    pub fn render(&self, slot: SlotHandle, size: Option<SlotSize>) {
        self.emit(&RenderEvent {
            slot,
            is_empty: false,
            size,
        });
    }

    pub fn render_pixels(&self, slot: SlotHandle, width: u32, height: u32) {
        self.render(slot, Some(SlotSize::pixel(width, height)));
    }

    pub fn render_empty(&self, slot: SlotHandle) {
        self.emit(&RenderEvent {
            slot,
            is_empty: true,
            size: None,
        });
    }

    pub fn emit(&self, event: &RenderEvent) {
        // listeners may add or remove listeners
        let listeners: Vec<RenderListener> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn record(&self, call: SdkCall) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, op: &'static str) -> Result<(), SdkError> {
        if self.failing.borrow().contains(op) {
            return Err(SdkError::rejected(op, "injected failure"));
        }

        Ok(())
    }

    fn allocate(&self) -> SlotHandle {
        let id = self.next_handle.get() + 1;
        self.next_handle.set(id);

        SlotHandle(id)
    }

    fn require_live(&self, slot: SlotHandle) -> Result<(), SdkError> {
        if self.slots.borrow().contains_key(&slot) {
            Ok(())
        } else {
            Err(SdkError::UnknownSlot(slot))
        }
    }
}

impl AdSdk for FakeSdk {
    fn define_slot(
        &self,
        ad_unit_path: &str,
        sizes: &[PixelSize],
        container_id: &str,
    ) -> Result<SlotHandle, SdkError> {
        self.check("define_slot")?;

        // the real library refuses a second slot on the same element
        if !self.live_in(container_id).is_empty() {
            return Err(SdkError::rejected(
                "define_slot",
                format!("'{container_id}' already has a slot"),
            ));
        }

        let handle = self.allocate();
        self.slots.borrow_mut().insert(
            handle,
            SlotInfo {
                handle,
                container_id: Some(container_id.to_string()),
            },
        );
        self.record(SdkCall::DefineSlot {
            ad_unit_path: ad_unit_path.to_string(),
            sizes: sizes.to_vec(),
            container_id: container_id.to_string(),
            handle,
        });

        Ok(handle)
    }

    fn define_size_mapping(
        &self,
        slot: SlotHandle,
        _mapping: &SizeMapping,
    ) -> Result<(), SdkError> {
        self.check("define_size_mapping")?;
        self.require_live(slot)?;
        self.record(SdkCall::DefineSizeMapping(slot));

        Ok(())
    }

    fn define_out_of_page_slot(
        &self,
        ad_unit_path: &str,
        format: OutOfPageFormat,
    ) -> Result<Option<SlotHandle>, SdkError> {
        self.check("define_out_of_page_slot")?;

        let handle = (!self.decline_out_of_page.get()).then(|| {
            let handle = self.allocate();
            self.slots.borrow_mut().insert(
                handle,
                SlotInfo {
                    handle,
                    container_id: None,
                },
            );
            handle
        });
        self.record(SdkCall::DefineOutOfPage {
            ad_unit_path: ad_unit_path.to_string(),
            format,
            handle,
        });

        Ok(handle)
    }

    fn add_service(&self, slot: SlotHandle) -> Result<(), SdkError> {
        self.check("add_service")?;
        self.require_live(slot)?;
        self.record(SdkCall::AddService(slot));

        Ok(())
    }

    fn display(&self, slot: SlotHandle) -> Result<(), SdkError> {
        self.check("display")?;
        self.require_live(slot)?;
        self.record(SdkCall::Display(slot));

        if let Some(size) = self.render_on_display.get() {
            self.render(slot, Some(size));
        }

        Ok(())
    }

    fn destroy_slots(&self, slots: &[SlotHandle]) -> Result<(), SdkError> {
        self.check("destroy_slots")?;
        {
            let mut live = self.slots.borrow_mut();
            for slot in slots {
                live.remove(slot);
            }
        }
        self.record(SdkCall::Destroy(slots.to_vec()));

        Ok(())
    }

    fn set_privacy(&self, settings: PrivacySettings) -> Result<(), SdkError> {
        self.check("set_privacy")?;
        self.record(SdkCall::SetPrivacy(settings));

        Ok(())
    }

    fn configure(&self, policy: &RenderPolicy) -> Result<(), SdkError> {
        self.check("configure")?;
        self.record(SdkCall::Configure(*policy));

        Ok(())
    }

    fn enable_services(&self) -> Result<(), SdkError> {
        self.check("enable_services")?;
        self.record(SdkCall::EnableServices);

        Ok(())
    }

    fn refresh(&self, slots: &[SlotHandle]) -> Result<(), SdkError> {
        self.check("refresh")?;
        self.record(SdkCall::Refresh(slots.to_vec()));

        Ok(())
    }

    fn slots(&self) -> Vec<SlotInfo> {
        self.slots.borrow().values().cloned().collect()
    }

    fn add_render_listener(&self, listener: RenderListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get() + 1);
        self.next_listener.set(id.0);
        self.listeners.borrow_mut().insert(id, listener);

        id
    }

    fn remove_render_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_live_slot_per_container() {
        let sdk = FakeSdk::new();
        let size = [PixelSize::new(300, 250)];

        let first = sdk.define_slot("/1/a", &size, "ad-1").expect("first define");
        assert!(sdk.define_slot("/1/a", &size, "ad-1").is_err());

        sdk.destroy_slots(&[first]).expect("destroy");
        assert!(sdk.define_slot("/1/a", &size, "ad-1").is_ok());
    }

    #[test]
    fn injected_failures_are_reported_per_op() {
        let sdk = FakeSdk::new();
        sdk.fail("enable_services");
        let policy = RenderPolicy {
            single_request: true,
            center_slots: false,
            lazy_load: None,
        };

        assert!(sdk.enable_services().is_err());
        assert!(sdk.configure(&policy).is_ok());
        assert!(!sdk.services_enabled());
    }
}
