use crate::{
    Error, ErrorOrigin,
    config::schema::SdkConfig,
    domain::{OutOfPageFormat, PixelSize, RenderEvent, SizeMapping, SlotHandle, SlotInfo},
    host::ListenerId,
};
use std::rc::Rc;
use thiserror::Error as ThisError;

///
/// SdkError
///

#[derive(Debug, ThisError)]
pub enum SdkError {
    #[error("sdk rejected '{op}': {reason}")]
    Rejected { op: &'static str, reason: String },

    #[error("sdk does not know {0}")]
    UnknownSlot(SlotHandle),

    #[error("sdk is unavailable")]
    Unavailable,
}

impl SdkError {
    pub fn rejected(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            op,
            reason: reason.into(),
        }
    }
}

impl From<SdkError> for Error {
    fn from(err: SdkError) -> Self {
        Self::infra(ErrorOrigin::Sdk, err.to_string())
    }
}

pub type RenderListener = Rc<dyn Fn(&RenderEvent)>;

///
/// PrivacySettings
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PrivacySettings {
    pub non_personalized_ads: bool,
    pub limited_ads: bool,
}

///
/// LazyLoad
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LazyLoad {
    pub fetch_margin_percent: u32,
    pub render_margin_percent: u32,
    pub mobile_scaling: f64,
}

///
/// RenderPolicy
/// Page-wide rendering behaviour configured once before services start.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPolicy {
    pub single_request: bool,
    pub center_slots: bool,
    pub lazy_load: Option<LazyLoad>,
}

impl From<&SdkConfig> for RenderPolicy {
    fn from(cfg: &SdkConfig) -> Self {
        let lazy = &cfg.lazy_load;

        Self {
            single_request: cfg.single_request,
            center_slots: cfg.center_slots,
            lazy_load: lazy.enabled.then_some(LazyLoad {
                fetch_margin_percent: lazy.fetch_margin_percent,
                render_margin_percent: lazy.render_margin_percent,
                mobile_scaling: lazy.mobile_scaling,
            }),
        }
    }
}

///
/// AdSdk
///
/// The ad-serving tag library, once loaded. adslot only ever calls it from
/// inside commands drained by the session's command queue.
///
/// Render listeners are invoked from the event loop, never from inside one
/// of these calls.
///

pub trait AdSdk {
    /// Create an in-page slot bound to `container_id`.
    /// `sizes` holds only pixel sizes; a fluid marker travels via
    /// [`AdSdk::define_size_mapping`].
    fn define_slot(
        &self,
        ad_unit_path: &str,
        sizes: &[PixelSize],
        container_id: &str,
    ) -> Result<SlotHandle, SdkError>;

    fn define_size_mapping(&self, slot: SlotHandle, mapping: &SizeMapping) -> Result<(), SdkError>;

    /// Create an out-of-page slot. `Ok(None)` means the SDK declined the
    /// format for this page (e.g. unsupported device).
    fn define_out_of_page_slot(
        &self,
        ad_unit_path: &str,
        format: OutOfPageFormat,
    ) -> Result<Option<SlotHandle>, SdkError>;

    /// Attach a slot to the page-level ad service.
    fn add_service(&self, slot: SlotHandle) -> Result<(), SdkError>;

    fn display(&self, slot: SlotHandle) -> Result<(), SdkError>;

    fn destroy_slots(&self, slots: &[SlotHandle]) -> Result<(), SdkError>;

    fn set_privacy(&self, settings: PrivacySettings) -> Result<(), SdkError>;

    fn configure(&self, policy: &RenderPolicy) -> Result<(), SdkError>;

    fn enable_services(&self) -> Result<(), SdkError>;

    /// Soft refresh: re-request creatives without redefining the slots.
    fn refresh(&self, slots: &[SlotHandle]) -> Result<(), SdkError>;

    /// Every slot the SDK currently knows about.
    fn slots(&self) -> Vec<SlotInfo>;

    fn add_render_listener(&self, listener: RenderListener) -> ListenerId;

    fn remove_render_listener(&self, id: ListenerId);
}
