use derive_more::Display;
use thiserror::Error as ThisError;

///
/// FlagScope
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum FlagScope {
    /// Cleared when the browser session ends.
    Session,
    /// Persists on this device.
    Device,
}

///
/// FlagStoreError
///

#[derive(Debug, ThisError)]
pub enum FlagStoreError {
    #[error("{scope} storage is unavailable")]
    Unavailable { scope: FlagScope },

    #[error("{scope} storage rejected '{key}': {reason}")]
    WriteFailed {
        scope: FlagScope,
        key: String,
        reason: String,
    },
}

///
/// FlagStore
/// Key/value flags owned by the host (session and device storage).
///

pub trait FlagStore {
    fn get(&self, scope: FlagScope, key: &str) -> Option<String>;

    fn set(&self, scope: FlagScope, key: &str, value: &str) -> Result<(), FlagStoreError>;
}
