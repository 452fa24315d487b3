use crate::host::{Scheduler, TimerId};
use futures::{
    FutureExt,
    channel::oneshot,
    future::{Either, select},
};
use std::{
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll},
    time::Duration,
};

///
/// Sleep
///
/// Future that resolves once a host timeout fires. Dropping it before then
/// clears the timeout, so an abandoned wait never leaves a timer behind.
///

pub struct Sleep {
    rx: oneshot::Receiver<()>,
    timer: Option<TimerId>,
    scheduler: Rc<dyn Scheduler>,
}

impl Future for Sleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match self.rx.poll_unpin(cx) {
            // a host that drops the task without running it also ends the wait
            Poll::Ready(_) => {
                self.timer = None;
                Poll::Ready(())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for Sleep {
    fn drop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.clear_timeout(id);
        }
    }
}

///
/// TimerOps
///

pub struct TimerOps;

impl TimerOps {
    /// Resolve after `delay` on the host event loop.
    #[must_use]
    pub fn sleep(scheduler: &Rc<dyn Scheduler>, delay: Duration) -> Sleep {
        let (tx, rx) = oneshot::channel();
        let id = scheduler.set_timeout(
            delay,
            Box::new(move || {
                let _ = tx.send(());
            }),
        );

        Sleep {
            rx,
            timer: Some(id),
            scheduler: Rc::clone(scheduler),
        }
    }

    /// Bounded wait: `Some(output)` if `fut` finishes first, `None` once
    /// `delay` elapses. The losing side is dropped.
    pub async fn timeout<F: Future>(
        scheduler: &Rc<dyn Scheduler>,
        delay: Duration,
        fut: F,
    ) -> Option<F::Output> {
        let fut = Box::pin(fut);

        match select(fut, Self::sleep(scheduler, delay)).await {
            Either::Left((output, _sleep)) => Some(output),
            Either::Right(((), _fut)) => None,
        }
    }
}
