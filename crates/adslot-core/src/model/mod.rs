//! Session-owned state.
//!
//! These types hold the mutable bookkeeping of a session (boot flags, the
//! slot registry, counters). They are owned by [`crate::Session`] and only
//! mutated from host callbacks and drained queue commands, which the event
//! loop already serializes.

pub mod boot;
pub mod metrics;
pub mod registry;

pub use boot::*;
pub use metrics::*;
pub use registry::*;
