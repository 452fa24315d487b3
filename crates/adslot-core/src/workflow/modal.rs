//! Frequency-capped overlay.
//!
//! ```text
//! Idle --(delay elapsed AND policy allows)--> Shown --(Escape | backdrop | close)--> Dismissed
//! ```
//!
//! The "already shown" flag is written when the modal is shown, not when it
//! is dismissed, so a reload while it is open still counts as a display.

use crate::{
    Error,
    config::schema::ModalConfig,
    host::{FlagStore, ListenerId, PageEvent, TimerId},
    log,
    log::Topic,
    session::Session,
};
use derive_more::Display;
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    time::Duration,
};

pub const MODAL_FLAG_PREFIX: &str = "adslot:modal:";

///
/// CloseReason
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum CloseReason {
    Escape,
    Backdrop,
    CloseButton,
}

///
/// ModalPhase
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum ModalPhase {
    Idle,
    Shown,
    #[display("dismissed({_0})")]
    Dismissed(CloseReason),
}

pub type ModalObserver = Rc<dyn Fn(ModalPhase)>;

struct ModalCell {
    phase: ModalPhase,
    timer: Option<TimerId>,
    key_listener: Option<ListenerId>,
    observer: Option<ModalObserver>,
}

///
/// FrequencyCappedModal
///

pub struct FrequencyCappedModal {
    session: Session,
    id: String,
    config: ModalConfig,
    cell: Rc<RefCell<ModalCell>>,
}

impl FrequencyCappedModal {
    /// Arm the modal configured under `id`. When the frequency policy
    /// already forbids it, no timer is started and it stays `Idle`.
    pub fn mount(session: &Session, id: &str) -> Result<Self, Error> {
        let config = session.config().modal(id)?.clone();
        let modal = Self {
            session: session.clone(),
            id: id.to_string(),
            config,
            cell: Rc::new(RefCell::new(ModalCell {
                phase: ModalPhase::Idle,
                timer: None,
                key_listener: None,
                observer: None,
            })),
        };

        if !modal.allowed() {
            log!(Topic::Modal, Debug, "'{id}' suppressed by {} policy", modal.config.policy);
            return Ok(modal);
        }

        let timer = {
            let weak = session.downgrade();
            let cell = Rc::downgrade(&modal.cell);
            let id = modal.id.clone();
            let config = modal.config.clone();

            session.host().scheduler.set_timeout(
                Duration::from_millis(modal.config.delay_ms),
                Box::new(move || {
                    let (Some(session), Some(cell)) = (weak.upgrade(), cell.upgrade()) else {
                        return;
                    };
                    Self::on_delay_elapsed(&session, &cell, &id, &config);
                }),
            )
        };
        modal.cell.borrow_mut().timer = Some(timer);

        Ok(modal)
    }

    /// Called with every phase transition.
    pub fn observe(&self, observer: impl Fn(ModalPhase) + 'static) {
        self.cell.borrow_mut().observer = Some(Rc::new(observer));
    }

    #[must_use]
    pub fn phase(&self) -> ModalPhase {
        self.cell.borrow().phase
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Close a shown modal. Returns false when it was not shown.
    pub fn dismiss(&self, reason: CloseReason) -> bool {
        Self::close(&self.session, &self.cell, reason)
    }

    fn flag_key(id: &str) -> String {
        format!("{MODAL_FLAG_PREFIX}{id}")
    }

    fn allowed(&self) -> bool {
        Self::policy_allows(&*self.session.host().flags, &self.id, &self.config)
    }

    fn policy_allows(flags: &dyn FlagStore, id: &str, config: &ModalConfig) -> bool {
        let previously_shown = config
            .policy
            .scope()
            .is_some_and(|scope| flags.get(scope, &Self::flag_key(id)).is_some());

        config.policy.allows(previously_shown)
    }

    fn on_delay_elapsed(
        session: &Session,
        cell: &Rc<RefCell<ModalCell>>,
        id: &str,
        config: &ModalConfig,
    ) {
        cell.borrow_mut().timer = None;

        // another instance may have shown meanwhile
        let flags = &*session.host().flags;
        if !Self::policy_allows(flags, id, config) {
            log!(Topic::Modal, Debug, "'{id}' shown elsewhere, staying idle");
            return;
        }

        if let Some(scope) = config.policy.scope()
            && let Err(err) = flags.set(scope, &Self::flag_key(id), "1")
        {
            log!(Topic::Modal, Warn, "'{id}' shown but not recorded: {err}");
        }

        let key_listener = {
            let weak_session = session.downgrade();
            let weak_cell: Weak<RefCell<ModalCell>> = Rc::downgrade(cell);
            session
                .host()
                .document
                .add_page_listener(Rc::new(move |event: &PageEvent| {
                    let PageEvent::KeyDown { key } = event else {
                        return;
                    };
                    if key != "Escape" {
                        return;
                    }
                    if let (Some(session), Some(cell)) =
                        (weak_session.upgrade(), weak_cell.upgrade())
                    {
                        Self::close(&session, &cell, CloseReason::Escape);
                    }
                }))
        };

        {
            let mut cell = cell.borrow_mut();
            cell.phase = ModalPhase::Shown;
            cell.key_listener = Some(key_listener);
        }
        log!(Topic::Modal, Info, "'{id}' shown");
        Self::notify(cell, ModalPhase::Shown);
    }

    fn close(session: &Session, cell: &Rc<RefCell<ModalCell>>, reason: CloseReason) -> bool {
        let listener = {
            let mut cell = cell.borrow_mut();
            if cell.phase != ModalPhase::Shown {
                return false;
            }
            cell.phase = ModalPhase::Dismissed(reason);
            cell.key_listener.take()
        };

        if let Some(id) = listener {
            session.host().document.remove_page_listener(id);
        }
        log!(Topic::Modal, Info, "modal dismissed ({reason})");
        Self::notify(cell, ModalPhase::Dismissed(reason));

        true
    }

    // observer runs with the cell released so it may query the modal
    fn notify(cell: &RefCell<ModalCell>, phase: ModalPhase) {
        let observer = cell.borrow().observer.clone();
        if let Some(observer) = observer {
            observer(phase);
        }
    }
}

impl Drop for FrequencyCappedModal {
    fn drop(&mut self) {
        let (timer, listener) = {
            let mut cell = self.cell.borrow_mut();
            (cell.timer.take(), cell.key_listener.take())
        };
        let host = self.session.host();

        if let Some(timer) = timer {
            host.scheduler.clear_timeout(timer);
        }
        if let Some(listener) = listener {
            host.document.remove_page_listener(listener);
        }
    }
}
