use crate::{
    domain::{Location, RouteKey},
    host::{ListenerId, PageEvent},
    log,
    log::Topic,
    ops::RefreshOps,
    session::{Session, WeakSession},
};
use std::{cell::RefCell, rc::Rc};

///
/// RouteRefreshCoordinator
///
/// Soft-refreshes in-page slots after client-side navigation, once per
/// distinct route, and again when the page comes back into view. The route
/// observed at attach time is the baseline and does not refresh.
///
/// Refreshes are deferred to an idle callback and then queued behind any
/// pending SDK commands, so slots defined by the new route's components are
/// included.
///

pub struct RouteRefreshCoordinator {
    session: Session,
    last_route: Rc<RefCell<RouteKey>>,
    route_listener: Option<ListenerId>,
    page_listener: Option<ListenerId>,
}

impl RouteRefreshCoordinator {
    #[must_use]
    pub fn attach(session: &Session) -> Self {
        let host = session.host();
        let baseline = host.navigation.location().route_key();
        log!(Topic::Refresh, Debug, "route baseline {baseline}");

        let last_route = Rc::new(RefCell::new(baseline));

        let route_listener = {
            let weak = session.downgrade();
            let last_route = Rc::downgrade(&last_route);
            host.navigation.subscribe(Rc::new(move |location: &Location| {
                if let Some(last_route) = last_route.upgrade() {
                    Self::route_changed(&weak, &last_route, &location.route_key());
                }
            }))
        };

        let refresh = session.config().refresh.clone();
        let page_listener = (refresh.on_visibility || refresh.on_pageshow).then(|| {
            let weak = session.downgrade();
            host.document.add_page_listener(Rc::new(move |event: &PageEvent| {
                let reason = match event {
                    PageEvent::VisibilityChanged { visible: true } if refresh.on_visibility => {
                        "page visible"
                    }
                    PageEvent::PageShow { persisted: true } if refresh.on_pageshow => {
                        "restored from cache"
                    }
                    _ => return,
                };
                Self::schedule(&weak, reason);
            }))
        });

        Self {
            session: session.clone(),
            last_route,
            route_listener: Some(route_listener),
            page_listener,
        }
    }

    /// Refresh for `route` unless it is the route processed last.
    /// Returns true when a refresh was scheduled.
    pub fn on_route_changed(&self, route: &RouteKey) -> bool {
        Self::route_changed(&self.session.downgrade(), &self.last_route, route)
    }

    #[must_use]
    pub fn last_route(&self) -> RouteKey {
        self.last_route.borrow().clone()
    }

    fn route_changed(weak: &WeakSession, last_route: &RefCell<RouteKey>, route: &RouteKey) -> bool {
        {
            let mut last = last_route.borrow_mut();
            if *last == *route {
                return false;
            }
            *last = route.clone();
        }

        Self::schedule(weak, "route change");

        true
    }

    // not cancellable; with no in-page slots left the refresh is a no-op
    fn schedule(weak: &WeakSession, reason: &'static str) {
        let Some(session) = weak.upgrade() else {
            return;
        };
        let weak = weak.clone();

        session.host().scheduler.request_idle(Box::new(move || {
            let Some(session) = weak.upgrade() else {
                return;
            };
            let inner = session.downgrade();

            session.queue().push(format!("refresh:{reason}"), move |sdk| {
                let Some(session) = inner.upgrade() else {
                    return Ok(());
                };
                RefreshOps::refresh_in_page(sdk, session.metrics(), reason)?;

                Ok(())
            });
        }));
    }
}

impl Drop for RouteRefreshCoordinator {
    fn drop(&mut self) {
        let host = self.session.host();

        if let Some(id) = self.route_listener.take() {
            host.navigation.unsubscribe(id);
        }
        if let Some(id) = self.page_listener.take() {
            host.document.remove_page_listener(id);
        }
    }
}
