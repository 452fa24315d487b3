//! Collaborator seams.
//!
//! Everything adslot consumes from the outside world is a trait in here:
//! the ad-serving SDK, the optional consent platform, the page document and
//! event loop, the navigation context and the flag store. Browser bindings
//! implement them over the real platform; the testkit implements them with
//! deterministic fakes.
//!
//! Every subscription returns an id so the owner can pair "subscribe on
//! mount" with "unsubscribe on unmount" explicitly.

pub mod cmp;
pub mod document;
pub mod flags;
pub mod navigation;
pub mod scheduler;
pub mod sdk;

pub use cmp::*;
pub use document::*;
pub use flags::*;
pub use navigation::*;
pub use scheduler::*;
pub use sdk::*;

use derive_more::Display;
use std::rc::Rc;

///
/// ListenerId
/// Opaque id for any callback registered with a collaborator.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("listener#{_0}")]
pub struct ListenerId(pub u64);

///
/// Host
/// The full set of collaborators a session is wired to.
///

#[derive(Clone)]
pub struct Host {
    pub scheduler: Rc<dyn Scheduler>,
    pub document: Rc<dyn Document>,
    pub sdk: Rc<dyn AdSdk>,
    pub cmp: Option<Rc<dyn ConsentPlatform>>,
    pub flags: Rc<dyn FlagStore>,
    pub navigation: Rc<dyn Navigation>,
}
