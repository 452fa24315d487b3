use crate::{
    domain::ConsentState,
    host::{ConsentPlatform, ListenerId, Scheduler},
    log,
    log::Topic,
    model::{MetricKind, Metrics},
    ops::TimerOps,
};
use futures::channel::oneshot;
use std::{future::Future, rc::Rc, time::Duration};

///
/// ConsentResolver
///
/// Reads the consent signal from the page's consent platform, if there is
/// one. Never blocks indefinitely and never fails: a missing platform yields
/// the non-EU default, a silent or broken one yields the fail-safe default.
///

pub struct ConsentResolver {
    cmp: Option<Rc<dyn ConsentPlatform>>,
    scheduler: Rc<dyn Scheduler>,
    metrics: Rc<Metrics>,
}

impl ConsentResolver {
    #[must_use]
    pub fn new(
        cmp: Option<Rc<dyn ConsentPlatform>>,
        scheduler: Rc<dyn Scheduler>,
        metrics: Rc<Metrics>,
    ) -> Self {
        Self {
            cmp,
            scheduler,
            metrics,
        }
    }

    #[must_use]
    pub const fn has_cmp(&self) -> bool {
        self.cmp.is_some()
    }

    /// Resolve with the platform's answer or, after `timeout`, with the
    /// fail-safe default.
    pub fn wait_for_signal(
        &self,
        timeout: Duration,
    ) -> impl Future<Output = ConsentState> + 'static {
        let cmp = self.cmp.clone();
        let scheduler = Rc::clone(&self.scheduler);
        let metrics = Rc::clone(&self.metrics);

        async move {
            let Some(cmp) = cmp else {
                log!(Topic::Consent, Info, "no consent platform, using non-EU default");
                return ConsentState::without_cmp();
            };

            let (tx, rx) = oneshot::channel();
            let request = cmp.get_consent_data(Box::new(move |state| {
                let _ = tx.send(state);
            }));
            if let Err(err) = request {
                log!(Topic::Consent, Warn, "consent request failed: {err}");
                return ConsentState::fail_safe();
            }

            match TimerOps::timeout(&scheduler, timeout, rx).await {
                Some(Ok(state)) => {
                    log!(
                        Topic::Consent,
                        Info,
                        "consent signal: gdpr={:?} consent_string={} status={}",
                        state.gdpr_applies,
                        state.has_consent_string,
                        state.event_status
                    );
                    state
                }
                Some(Err(_canceled)) => {
                    log!(Topic::Consent, Warn, "consent platform dropped the request");
                    ConsentState::fail_safe()
                }
                None => {
                    metrics.increment(MetricKind::ConsentTimeout);
                    log!(
                        Topic::Consent,
                        Warn,
                        "no consent signal after {}ms, using fail-safe default",
                        timeout.as_millis()
                    );
                    ConsentState::fail_safe()
                }
            }
        }
    }

    /// Deliver every later consent transition to `on_change` until the
    /// returned subscription is dropped. Without a platform the non-EU
    /// default is delivered once, immediately.
    pub fn subscribe(&self, on_change: impl Fn(ConsentState) + 'static) -> ConsentSubscription {
        let Some(cmp) = self.cmp.clone() else {
            on_change(ConsentState::without_cmp());
            return ConsentSubscription::inert();
        };

        match cmp.add_event_listener(Rc::new(on_change)) {
            Ok(id) => ConsentSubscription {
                cmp: Some(cmp),
                id: Some(id),
            },
            Err(err) => {
                log!(Topic::Consent, Warn, "consent listener rejected: {err}");
                ConsentSubscription::inert()
            }
        }
    }
}

///
/// ConsentSubscription
/// Detaches its listener from the consent platform when dropped.
///

pub struct ConsentSubscription {
    cmp: Option<Rc<dyn ConsentPlatform>>,
    id: Option<ListenerId>,
}

impl ConsentSubscription {
    const fn inert() -> Self {
        Self {
            cmp: None,
            id: None,
        }
    }

    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.id.is_some()
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for ConsentSubscription {
    fn drop(&mut self) {
        if let (Some(cmp), Some(id)) = (self.cmp.take(), self.id.take()) {
            cmp.remove_event_listener(id);
        }
    }
}
