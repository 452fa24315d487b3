//! Plain domain values shared by every layer.
//!
//! Nothing in here talks to a collaborator; these are the shapes that flow
//! between the SDK, the consent platform and the controllers.

pub mod consent;
pub mod layout;
pub mod route;
pub mod size;
pub mod slot;

pub use consent::*;
pub use layout::*;
pub use route::*;
pub use size::*;
pub use slot::*;
