use crate::{
    config::AdsConfig,
    domain::{OutOfPageKind, SlotHandle},
    host::Host,
    log::LogBuffer,
    model::{BootState, Metrics, SlotRegistry, SlotRegistryView},
    ops::SdkQueue,
    policy::consent::PrivacyMode,
    workflow::{
        bootstrap::BootstrapWorkflow,
        consent::{ConsentResolver, ConsentSubscription},
    },
};
use std::{
    cell::{Cell, RefCell, RefMut},
    rc::{Rc, Weak},
    sync::Arc,
};

///
/// Session
///
/// Everything that lives exactly once per browsing tab: the config, the host
/// collaborators, boot flags, the slot registry and the SDK command queue.
///
/// A session is created once by the page shell and handed by reference to
/// every controller; cloning is cheap and shares the same state. Nothing in
/// here is ambient global state, so tests can build as many isolated
/// sessions as they like.
///

#[derive(Clone)]
pub struct Session {
    inner: Rc<SessionInner>,
}

///
/// WeakSession
/// Non-owning handle for long-lived callbacks.
///

#[derive(Clone)]
pub struct WeakSession {
    inner: Weak<SessionInner>,
}

impl WeakSession {
    #[must_use]
    pub fn upgrade(&self) -> Option<Session> {
        self.inner.upgrade().map(|inner| Session { inner })
    }
}

struct SessionInner {
    config: Arc<AdsConfig>,
    host: Host,
    metrics: Rc<Metrics>,
    queue: SdkQueue,
    consent: ConsentResolver,
    boot: RefCell<BootState>,
    registry: RefCell<SlotRegistry>,
    privacy: Cell<Option<PrivacyMode>>,
    consent_subscription: RefCell<Option<ConsentSubscription>>,
    out_of_page_slots: RefCell<Vec<(OutOfPageKind, SlotHandle)>>,
}

impl Session {
    #[must_use]
    pub fn new(config: Arc<AdsConfig>, host: Host) -> Self {
        // thread-wide; a later session with another `[log]` table keeps the first
        LogBuffer::configure(usize::try_from(config.log.max_entries).unwrap_or(usize::MAX));

        let metrics = Rc::new(Metrics::default());
        let queue = SdkQueue::new(Rc::clone(&host.sdk), Rc::clone(&metrics));
        let consent = ConsentResolver::new(
            host.cmp.clone(),
            Rc::clone(&host.scheduler),
            Rc::clone(&metrics),
        );

        Self {
            inner: Rc::new(SessionInner {
                config,
                host,
                metrics,
                queue,
                consent,
                boot: RefCell::new(BootState::default()),
                registry: RefCell::new(SlotRegistry::default()),
                privacy: Cell::new(None),
                consent_subscription: RefCell::new(None),
                out_of_page_slots: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Load and configure the ad SDK; only the first call does anything.
    /// Returns true for that first call.
    pub fn boot_once(&self) -> bool {
        BootstrapWorkflow::boot_once(self)
    }

    #[must_use]
    pub fn downgrade(&self) -> WeakSession {
        WeakSession {
            inner: Rc::downgrade(&self.inner),
        }
    }

    //
    // Accessors
    //

    #[must_use]
    pub fn config(&self) -> &AdsConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn host(&self) -> &Host {
        &self.inner.host
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.inner.metrics
    }

    #[must_use]
    pub fn queue(&self) -> &SdkQueue {
        &self.inner.queue
    }

    #[must_use]
    pub fn consent(&self) -> &ConsentResolver {
        &self.inner.consent
    }

    #[must_use]
    pub fn boot_state(&self) -> BootState {
        *self.inner.boot.borrow()
    }

    /// Privacy mode currently applied to the SDK; `None` before bootstrap
    /// has applied one.
    #[must_use]
    pub fn privacy_mode(&self) -> Option<PrivacyMode> {
        self.inner.privacy.get()
    }

    #[must_use]
    pub fn registry_view(&self) -> SlotRegistryView {
        self.inner.registry.borrow().view()
    }

    #[must_use]
    pub fn live_handle(&self, container_id: &str) -> Option<SlotHandle> {
        self.inner.registry.borrow().handle(container_id)
    }

    #[must_use]
    pub fn out_of_page_slots(&self) -> Vec<(OutOfPageKind, SlotHandle)> {
        self.inner.out_of_page_slots.borrow().clone()
    }

    //
    // Crate-internal mutation
    //

    pub(crate) fn boot_mut(&self) -> RefMut<'_, BootState> {
        self.inner.boot.borrow_mut()
    }

    pub(crate) fn registry_mut(&self) -> RefMut<'_, SlotRegistry> {
        self.inner.registry.borrow_mut()
    }

    pub(crate) fn set_privacy_mode(&self, mode: PrivacyMode) {
        self.inner.privacy.set(Some(mode));
    }

    pub(crate) fn set_consent_subscription(&self, subscription: ConsentSubscription) {
        *self.inner.consent_subscription.borrow_mut() = Some(subscription);
    }

    pub(crate) fn record_out_of_page(&self, kind: OutOfPageKind, handle: SlotHandle) {
        self.inner.out_of_page_slots.borrow_mut().push((kind, handle));
    }
}
