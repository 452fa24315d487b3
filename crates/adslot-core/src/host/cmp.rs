use crate::{Error, ErrorOrigin, domain::ConsentState, host::ListenerId};
use std::rc::Rc;
use thiserror::Error as ThisError;

///
/// CmpError
///

#[derive(Debug, ThisError)]
pub enum CmpError {
    #[error("cmp call '{op}' failed: {reason}")]
    CallFailed { op: &'static str, reason: String },
}

impl From<CmpError> for Error {
    fn from(err: CmpError) -> Self {
        Self::infra(ErrorOrigin::Cmp, err.to_string())
    }
}

pub type ConsentCallback = Box<dyn FnOnce(ConsentState)>;
pub type ConsentListener = Rc<dyn Fn(ConsentState)>;

///
/// ConsentPlatform
///
/// A Transparency & Consent platform injected into the page by a third party.
/// It may answer late, never, or not exist at all.
///

pub trait ConsentPlatform {
    /// Ask for the current consent data; the callback fires at most once.
    fn get_consent_data(&self, callback: ConsentCallback) -> Result<(), CmpError>;

    /// Receive every consent transition until removed.
    fn add_event_listener(&self, listener: ConsentListener) -> Result<ListenerId, CmpError>;

    fn remove_event_listener(&self, id: ListenerId);
}
