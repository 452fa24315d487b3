use adslot_core::host::{FlagScope, FlagStore, FlagStoreError};
use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
};

///
/// MemoryFlagStore
///
/// In-memory session and device storage. Share one instance between two
/// sessions to simulate a reload; call [`MemoryFlagStore::end_session`] to
/// simulate closing the browser.
///

#[derive(Default)]
pub struct MemoryFlagStore {
    flags: RefCell<HashMap<(FlagScope, String), String>>,
    read_only: Cell<bool>,
}

impl MemoryFlagStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every write, like storage in a locked-down private window.
    pub fn make_read_only(&self) {
        self.read_only.set(true);
    }

    pub fn end_session(&self) {
        self.flags
            .borrow_mut()
            .retain(|(scope, _), _| *scope != FlagScope::Session);
    }

    #[must_use]
    pub fn contains(&self, scope: FlagScope, key: &str) -> bool {
        self.flags.borrow().contains_key(&(scope, key.to_string()))
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, scope: FlagScope, key: &str) -> Option<String> {
        self.flags.borrow().get(&(scope, key.to_string())).cloned()
    }

    fn set(&self, scope: FlagScope, key: &str, value: &str) -> Result<(), FlagStoreError> {
        if self.read_only.get() {
            return Err(FlagStoreError::WriteFailed {
                scope,
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }

        self.flags
            .borrow_mut()
            .insert((scope, key.to_string()), value.to_string());

        Ok(())
    }
}
