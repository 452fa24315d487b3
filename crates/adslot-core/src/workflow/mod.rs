//! Orchestration.
//!
//! Workflows own the lifecycles: they read session state, ask a policy,
//! then act through ops and the host collaborators.

pub mod bootstrap;
pub mod consent;
pub mod modal;
pub mod out_of_page;
pub mod refresh;
pub mod slot;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        log,
        log::Topic,
        workflow::{
            modal::{CloseReason, FrequencyCappedModal, ModalPhase},
            out_of_page::OutOfPageController,
            refresh::RouteRefreshCoordinator,
            slot::{SlotController, SlotPhase},
        },
    };
}
