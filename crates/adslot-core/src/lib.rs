//! Ad slot lifecycle for client-rendered single-page applications.
//!
//! adslot boots a third-party ad-serving SDK exactly once per tab, gates it
//! on a consent signal, defines and destroys in-page slots as components
//! mount and unmount across client-side navigations, and fits fixed-size
//! creatives to their containers.
//!
//! ## Layering
//!
//! - `host/` holds the collaborator traits (SDK, consent platform, document,
//!   scheduler, flags, navigation) the embedding page implements.
//! - `workflow/` implements the lifecycles: bootstrap, slots, out-of-page
//!   singletons, route refresh and the frequency-capped modal.
//! - `policy/` owns deterministic decision rules.
//! - `ops/` provides mechanical, reusable side-effecting operations, most
//!   notably the SDK command queue.
//! - `model/` owns the session's mutable bookkeeping.
//! - `domain/` holds plain value types.
//!
//! The default flow is: host callback → workflow → policy → ops → model.
//!
//! Everything hangs off a [`Session`]; there are no globals apart from the
//! log buffer.

pub mod config;
pub mod domain;
pub mod error;
pub mod host;
pub mod log;
pub mod model;
pub mod ops;
pub mod policy;
pub mod session;
pub mod workflow;

pub use {
    config::{AdsConfig, Config, ConfigError},
    error::{Error, ErrorClass, ErrorOrigin},
    session::{Session, WeakSession},
};

///
/// Crate Version
///

pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
