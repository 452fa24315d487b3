use adslot_core::{
    domain::{ConsentEventStatus, ConsentState},
    host::{CmpError, ConsentCallback, ConsentListener, ConsentPlatform, ListenerId},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

///
/// FakeCmp
///
/// Scriptable consent platform. Silent by default: data requests are held
/// until [`FakeCmp::respond`] is called, or answered on the spot once
/// [`FakeCmp::answering`] has set a state.
///

#[derive(Default)]
pub struct FakeCmp {
    answer: Cell<Option<ConsentState>>,
    pending: RefCell<Vec<ConsentCallback>>,
    listeners: RefCell<BTreeMap<ListenerId, ConsentListener>>,
    broken: Cell<bool>,
    next_listener: Cell<u64>,
}

impl FakeCmp {
    /// A platform that never answers.
    #[must_use]
    pub fn silent() -> Self {
        Self::default()
    }

    /// A platform that answers every request immediately with `state`.
    #[must_use]
    pub fn answering(state: ConsentState) -> Self {
        let cmp = Self::default();
        cmp.answer.set(Some(state));
        cmp
    }

    /// A platform whose API calls throw.
    #[must_use]
    pub fn broken() -> Self {
        let cmp = Self::default();
        cmp.broken.set(true);
        cmp
    }

    /// EU visitor who accepted: gdpr applies and a consent string exists.
    #[must_use]
    pub const fn consented() -> ConsentState {
        ConsentState {
            gdpr_applies: Some(true),
            has_consent_string: true,
            event_status: ConsentEventStatus::ConsentComplete,
        }
    }

    /// EU visitor with no consent string yet.
    #[must_use]
    pub const fn refused() -> ConsentState {
        ConsentState {
            gdpr_applies: Some(true),
            has_consent_string: false,
            event_status: ConsentEventStatus::CmpShown,
        }
    }

    /// Answer every held data request.
    pub fn respond(&self, state: ConsentState) {
        let pending = self.pending.take();
        for callback in pending {
            callback(state);
        }
    }

    /// Deliver a consent transition to every listener.
    pub fn emit(&self, state: ConsentState) {
        let listeners: Vec<ConsentListener> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(state);
        }
    }

    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.pending.borrow().len()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl ConsentPlatform for FakeCmp {
    fn get_consent_data(&self, callback: ConsentCallback) -> Result<(), CmpError> {
        if self.broken.get() {
            return Err(CmpError::CallFailed {
                op: "getTCData",
                reason: "stub threw".to_string(),
            });
        }

        match self.answer.get() {
            Some(state) => callback(state),
            None => self.pending.borrow_mut().push(callback),
        }

        Ok(())
    }

    fn add_event_listener(&self, listener: ConsentListener) -> Result<ListenerId, CmpError> {
        if self.broken.get() {
            return Err(CmpError::CallFailed {
                op: "addEventListener",
                reason: "stub threw".to_string(),
            });
        }

        let id = ListenerId(self.next_listener.get() + 1);
        self.next_listener.set(id.0);
        self.listeners.borrow_mut().insert(id, listener);

        Ok(id)
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}
