use crate::{
    Error,
    host::AdSdk,
    log,
    log::Topic,
    model::{MetricKind, Metrics},
};
use derive_more::Display;
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

pub type Command<T> = Box<dyn FnOnce(&T) -> Result<(), Error>>;

/// The queue every SDK interaction goes through.
pub type SdkQueue = CommandQueue<dyn AdSdk>;

///
/// QueueState
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum QueueState {
    /// Target not ready yet; commands are buffered.
    Pending,
    /// Target ready; commands run as soon as they are pushed.
    Ready,
    /// Target will never be ready; commands are dropped.
    Failed,
}

///
/// CommandQueue
///
/// FIFO command queue with drain-on-ready semantics.
///
/// Semantics:
/// - Commands pushed while `Pending` are buffered and run in submission order
///   once `mark_ready` is called.
/// - Commands pushed while `Ready` run immediately, unless a drain is already
///   in progress, in which case they are appended and run by that drain.
///   Submission order is preserved either way, including for commands pushed
///   from inside other commands.
/// - After `mark_failed` every buffered and future command is dropped.
/// - A failing command is logged and counted; it never stops the drain.
///

pub struct CommandQueue<T: ?Sized> {
    target: Rc<T>,
    metrics: Rc<Metrics>,
    state: Cell<QueueState>,
    pending: RefCell<VecDeque<(String, Command<T>)>>,
    draining: Cell<bool>,
}

impl<T: ?Sized> CommandQueue<T> {
    pub fn new(target: Rc<T>, metrics: Rc<Metrics>) -> Self {
        Self {
            target,
            metrics,
            state: Cell::new(QueueState::Pending),
            pending: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
        }
    }

    #[must_use]
    pub fn state(&self) -> QueueState {
        self.state.get()
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Enqueue a command. Returns false when it was dropped because the
    /// queue has failed.
    pub fn push(
        &self,
        label: impl Into<String>,
        command: impl FnOnce(&T) -> Result<(), Error> + 'static,
    ) -> bool {
        let label = label.into();

        if self.state.get() == QueueState::Failed {
            self.metrics.increment(MetricKind::CommandDropped);
            log!(Topic::Queue, Debug, "dropped '{label}': sdk unavailable");
            return false;
        }

        self.pending
            .borrow_mut()
            .push_back((label, Box::new(command)));

        if self.state.get() == QueueState::Ready {
            self.drain();
        }

        true
    }

    /// Transition `Pending → Ready` and run everything buffered so far.
    pub fn mark_ready(&self) {
        if self.state.get() != QueueState::Pending {
            return;
        }

        self.state.set(QueueState::Ready);
        log!(
            Topic::Queue,
            Info,
            "queue ready, draining {} command(s)",
            self.pending_len()
        );
        self.drain();
    }

    /// Transition to `Failed`, dropping everything buffered.
    pub fn mark_failed(&self) {
        if self.state.get() == QueueState::Failed {
            return;
        }

        self.state.set(QueueState::Failed);
        let dropped = self.pending.take().len();
        self.metrics.add(MetricKind::CommandDropped, dropped as u64);
        log!(
            Topic::Queue,
            Warn,
            "queue failed, dropped {dropped} pending command(s)"
        );
    }

    fn drain(&self) {
        if self.draining.replace(true) {
            return;
        }

        loop {
            // release the borrow before running: commands may push
            let next = self.pending.borrow_mut().pop_front();
            let Some((label, command)) = next else {
                break;
            };

            if let Err(err) = command(&*self.target) {
                self.metrics.increment(MetricKind::CommandFailed);
                log!(Topic::Queue, Warn, "command '{label}' failed: {err}");
            }

            if self.state.get() == QueueState::Failed {
                break;
            }
        }

        self.draining.set(false);
    }
}

///
/// TESTS
///
