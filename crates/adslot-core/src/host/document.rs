use crate::{Error, ErrorOrigin, domain::ContainerLayout, host::ListenerId};
use derive_more::Display;
use std::rc::Rc;
use thiserror::Error as ThisError;

///
/// ScriptError
///

#[derive(Debug, ThisError)]
pub enum ScriptError {
    #[error("script '{0}' failed to load")]
    LoadFailed(String),

    #[error("script '{0}' was blocked")]
    Blocked(String),
}

impl From<ScriptError> for Error {
    fn from(err: ScriptError) -> Self {
        Self::infra(ErrorOrigin::Host, err.to_string())
    }
}

///
/// ObserverId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("observer#{_0}")]
pub struct ObserverId(pub u64);

///
/// PageEvent
/// Platform events adslot reacts to.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PageEvent {
    VisibilityChanged { visible: bool },
    PageShow { persisted: bool },
    KeyDown { key: String },
}

pub type ScriptCallback = Box<dyn FnOnce(Result<(), ScriptError>)>;
pub type WidthCallback = Rc<dyn Fn(f64)>;
pub type PageListener = Rc<dyn Fn(&PageEvent)>;

///
/// Document
/// The page the ads live in.
///

pub trait Document {
    /// True when a `<script>` with this `src` is already in the page.
    fn has_script(&self, src: &str) -> bool;

    /// Append an async script; `on_load` fires once with the outcome.
    fn inject_script(&self, src: &str, on_load: ScriptCallback);

    /// Current content-box width of a container, if it is in the page.
    fn container_width(&self, container_id: &str) -> Option<f64>;

    fn apply_layout(&self, container_id: &str, layout: &ContainerLayout);

    /// Continuously report width changes of a container until unobserved.
    fn observe_width(&self, container_id: &str, on_change: WidthCallback) -> ObserverId;

    fn unobserve_width(&self, id: ObserverId);

    fn add_page_listener(&self, listener: PageListener) -> ListenerId;

    fn remove_page_listener(&self, id: ListenerId);
}
