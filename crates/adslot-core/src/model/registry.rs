use crate::{
    Error, ErrorOrigin,
    domain::{SizeMapping, SlotDefinition, SlotHandle, SlotInstance, SlotSize, pixel_sizes},
    host::{AdSdk, SdkError},
    log,
    log::Topic,
};
use std::collections::HashMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("container id must not be empty")]
    EmptyContainerId,

    #[error("failed to define slot for '{container_id}': {source}")]
    Define {
        container_id: String,
        source: SdkError,
    },

    #[error("failed to attach slot for '{container_id}' to the page service: {source}")]
    Attach {
        container_id: String,
        source: SdkError,
    },
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::ops(ErrorOrigin::Registry, err.to_string())
    }
}

///
/// DefineOutcome
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DefineOutcome {
    pub instance: SlotInstance,
    /// Handle of the instance that was destroyed to make room, if any.
    pub replaced: Option<SlotHandle>,
}

///
/// SlotRegistryView
///

pub type SlotRegistryView = Vec<SlotInstance>;

///
/// SlotRegistry
///
/// Single source of truth for slot liveness per container id.
///
/// Invariant: at most one live instance per container id. A previous
/// instance is always removed and handed to the SDK for destruction before
/// the next definition for the same id is issued.
///

#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: HashMap<String, SlotInstance>,
}

impl SlotRegistry {
    //
    // Lifecycle
    //

    /// Define (or re-define) the slot for `container_id`. Display is left to
    /// the caller so it can publish the handle before the first render.
    pub fn define(
        &mut self,
        sdk: &dyn AdSdk,
        container_id: &str,
        definition: &SlotDefinition,
    ) -> Result<DefineOutcome, RegistryError> {
        if container_id.is_empty() {
            return Err(RegistryError::EmptyContainerId);
        }

        let replaced = self.destroy(sdk, container_id);

        let handle = sdk
            .define_slot(
                &definition.ad_unit_path,
                &pixel_sizes(&definition.sizes),
                container_id,
            )
            .map_err(|source| RegistryError::Define {
                container_id: container_id.to_string(),
                source,
            })?;

        if let Some(mapping) = SizeMapping::for_sizes(&definition.sizes)
            && let Err(err) = sdk.define_size_mapping(handle, &mapping)
        {
            // pixel sizes still serve; only the fluid class is lost
            log!(
                Topic::Registry,
                Warn,
                "size mapping rejected for '{container_id}' ({handle}): {err}"
            );
        }

        if let Err(source) = sdk.add_service(handle) {
            Self::destroy_handle(sdk, container_id, handle);
            return Err(RegistryError::Attach {
                container_id: container_id.to_string(),
                source,
            });
        }

        let instance = SlotInstance {
            container_id: container_id.to_string(),
            handle,
            last_served_size: None,
            displayed: false,
        };

        self.slots.insert(container_id.to_string(), instance.clone());
        log!(
            Topic::Registry,
            Debug,
            "defined {handle} for '{container_id}' -> {}",
            definition.ad_unit_path
        );

        Ok(DefineOutcome { instance, replaced })
    }

    /// Tear down the instance for `container_id`, if any.
    /// Returns the destroyed handle.
    pub fn destroy(&mut self, sdk: &dyn AdSdk, container_id: &str) -> Option<SlotHandle> {
        let instance = self.slots.remove(container_id)?;
        Self::destroy_handle(sdk, container_id, instance.handle);

        Some(instance.handle)
    }

    /// Tear down the instance for `container_id` only if it is still `handle`.
    /// A newer definition for the same container is left alone.
    pub fn release(&mut self, sdk: &dyn AdSdk, container_id: &str, handle: SlotHandle) -> bool {
        let is_current = self
            .slots
            .get(container_id)
            .is_some_and(|instance| instance.handle == handle);

        if !is_current {
            log!(
                Topic::Registry,
                Debug,
                "skip release of stale {handle} for '{container_id}'"
            );
            return false;
        }

        self.destroy(sdk, container_id).is_some()
    }

    fn destroy_handle(sdk: &dyn AdSdk, container_id: &str, handle: SlotHandle) {
        // the registry entry is gone either way; a failed SDK destroy must not
        // keep a second live handle bookkept for this container
        if let Err(err) = sdk.destroy_slots(&[handle]) {
            log!(
                Topic::Registry,
                Warn,
                "destroy failed for '{container_id}' ({handle}): {err}"
            );
        }
    }

    //
    // Render bookkeeping
    //

    /// Note that display was requested for `handle`.
    pub fn mark_displayed(&mut self, handle: SlotHandle) -> bool {
        self.slots
            .values_mut()
            .find(|instance| instance.handle == handle)
            .map(|instance| instance.displayed = true)
            .is_some()
    }

    /// Record the size the SDK served for `handle`. Returns false when the
    /// handle is no longer live.
    pub fn record_served(&mut self, handle: SlotHandle, size: Option<SlotSize>) -> bool {
        self.slots
            .values_mut()
            .find(|instance| instance.handle == handle)
            .map(|instance| instance.last_served_size = size)
            .is_some()
    }

    //
    // Queries
    //

    #[must_use]
    pub fn get(&self, container_id: &str) -> Option<&SlotInstance> {
        self.slots.get(container_id)
    }

    #[must_use]
    pub fn handle(&self, container_id: &str) -> Option<SlotHandle> {
        self.get(container_id).map(|instance| instance.handle)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All live instances, sorted by container id.
    #[must_use]
    pub fn view(&self) -> SlotRegistryView {
        let mut view: SlotRegistryView = self.slots.values().cloned().collect();
        view.sort_by(|a, b| a.container_id.cmp(&b.container_id));

        view
    }
}
