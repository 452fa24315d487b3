//! Mechanical, reusable side-effecting operations.

pub mod queue;
pub mod refresh;
pub mod timer;

pub use queue::*;
pub use refresh::*;
pub use timer::*;
