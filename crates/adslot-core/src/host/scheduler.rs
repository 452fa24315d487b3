use derive_more::Display;
use futures::future::LocalBoxFuture;
use std::time::Duration;

///
/// TimerId
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("timer#{_0}")]
pub struct TimerId(pub u64);

pub type Task = Box<dyn FnOnce()>;

///
/// Scheduler
///
/// The page's single-threaded event loop. Nothing here runs concurrently:
/// tasks and spawned futures are interleaved cooperatively.
///

pub trait Scheduler {
    /// One-shot macrotask after `delay`.
    fn set_timeout(&self, delay: Duration, task: Task) -> TimerId;

    /// Cancel a pending timeout; no-op when it already fired.
    fn clear_timeout(&self, id: TimerId);

    /// Run `task` when the event loop is idle.
    fn request_idle(&self, task: Task);

    /// Drive a local future to completion on the event loop.
    fn spawn_local(&self, future: LocalBoxFuture<'static, ()>);
}
