//! SDK bootstrap.
//!
//! Boot order, executed once per session:
//! (a) inject the ad script unless the page already has it
//! (b) wait for the first consent signal, bounded, alongside the script load
//! (c) apply the resulting privacy mode
//! (d) configure batching, lazy loading and centering
//! (e) enable services
//! (f) keep a consent subscription that re-applies privacy and refreshes
//!     in-page slots on every later change
//!
//! Only after (e) does the command queue open, so every slot definition that
//! controllers pushed meanwhile runs against a fully configured SDK.

use crate::{
    Error,
    domain::ConsentState,
    host::{AdSdk, RenderPolicy, ScriptError},
    log,
    log::Topic,
    model::MetricKind,
    ops::RefreshOps,
    policy::consent::PrivacyMode,
    session::{Session, WeakSession},
};
use futures::{
    FutureExt,
    channel::oneshot,
    future::{self, LocalBoxFuture},
};
use std::time::Duration;

///
/// BootstrapWorkflow
///

pub struct BootstrapWorkflow;

impl BootstrapWorkflow {
    /// Returns true only for the call that actually started the boot.
    pub fn boot_once(session: &Session) -> bool {
        if !session.boot_mut().begin_boot() {
            return false;
        }

        log!(Topic::Boot, Info, "booting ad sdk");

        let script = Self::load_script(session);
        let timeout = Duration::from_millis(session.config().consent.timeout_ms);
        let consent = session.consent().wait_for_signal(timeout);
        let weak = session.downgrade();

        session.host().scheduler.spawn_local(Box::pin(async move {
            let (script, consent) = future::join(script, consent).await;

            if let Some(session) = weak.upgrade() {
                Self::finish(&session, script, consent);
            }
        }));

        true
    }

    fn load_script(session: &Session) -> LocalBoxFuture<'static, Result<(), ScriptError>> {
        let src = session.config().sdk.script_url.clone();
        let document = &session.host().document;

        if document.has_script(&src) {
            log!(Topic::Boot, Debug, "ad script already present: {src}");
            return future::ready(Ok(())).boxed_local();
        }

        let (tx, rx) = oneshot::channel();
        document.inject_script(
            &src,
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        session.metrics().increment(MetricKind::ScriptInjected);
        log!(Topic::Boot, Info, "injected ad script: {src}");

        async move {
            rx.await
                .unwrap_or_else(|_| Err(ScriptError::LoadFailed(src)))
        }
        .boxed_local()
    }

    fn finish(session: &Session, script: Result<(), ScriptError>, consent: ConsentState) {
        if let Err(err) = script {
            log!(Topic::Boot, Error, "ad sdk unavailable, ads disabled: {err}");
            session.queue().mark_failed();
            return;
        }

        let sdk = &*session.host().sdk;

        // (c)
        let mode = PrivacyMode::for_consent(&consent);
        if let Err(err) = Self::apply_privacy(session, sdk, mode) {
            log!(Topic::Boot, Warn, "initial privacy mode not applied: {err}");
        }

        // (d)
        let policy = RenderPolicy::from(&session.config().sdk);
        if let Err(err) = sdk.configure(&policy) {
            log!(Topic::Boot, Warn, "render policy rejected: {err}");
        }

        // (e)
        if let Err(err) = sdk.enable_services() {
            log!(Topic::Boot, Error, "enable services failed, ads disabled: {err}");
            session.queue().mark_failed();
            return;
        }
        session.metrics().increment(MetricKind::ServicesEnabled);

        // (f)
        let weak = session.downgrade();
        let subscription = session
            .consent()
            .subscribe(move |state| Self::on_consent_change(&weak, state));
        session.set_consent_subscription(subscription);

        log!(Topic::Boot, Ok, "ad sdk ready ({mode})");
        session.queue().mark_ready();
    }

    fn apply_privacy(session: &Session, sdk: &dyn AdSdk, mode: PrivacyMode) -> Result<(), Error> {
        // recorded before the call so a rejected call is not retried per event
        session.set_privacy_mode(mode);
        Self::push_privacy(session, sdk, mode)
    }

    fn push_privacy(session: &Session, sdk: &dyn AdSdk, mode: PrivacyMode) -> Result<(), Error> {
        sdk.set_privacy(mode.settings())?;
        session.metrics().increment(MetricKind::PrivacyApplied);

        Ok(())
    }

    fn on_consent_change(weak: &WeakSession, state: ConsentState) {
        let Some(session) = weak.upgrade() else {
            return;
        };

        let mode = PrivacyMode::for_consent(&state);
        if session.privacy_mode() == Some(mode) {
            return;
        }

        // claimed now, so a burst of identical events queues a single refresh
        session.set_privacy_mode(mode);
        log!(Topic::Consent, Info, "privacy mode changed to {mode}");
        let weak = session.downgrade();

        session.queue().push("consent:reapply", move |sdk| {
            let Some(session) = weak.upgrade() else {
                return Ok(());
            };

            Self::push_privacy(&session, sdk, mode)?;
            RefreshOps::refresh_in_page(sdk, session.metrics(), "consent change")?;

            Ok(())
        });
    }
}
