use adslot_core::{
    domain::Location,
    host::{ListenerId, Navigation, RouteListener},
};
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
};

///
/// FakeNavigation
/// Client-side router driven by the test.
///

#[derive(Default)]
pub struct FakeNavigation {
    location: RefCell<Location>,
    listeners: RefCell<BTreeMap<ListenerId, RouteListener>>,
    next_listener: Cell<u64>,
}

impl FakeNavigation {
    #[must_use]
    pub fn at(path: &str, query: &str) -> Self {
        let nav = Self::default();
        *nav.location.borrow_mut() = Location::new(path, query);
        nav
    }

    /// Move to a new route and notify every subscriber.
    pub fn navigate(&self, path: &str, query: &str) {
        let location = Location::new(path, query);
        *self.location.borrow_mut() = location.clone();

        let listeners: Vec<RouteListener> = self.listeners.borrow().values().cloned().collect();
        for listener in listeners {
            listener(&location);
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Navigation for FakeNavigation {
    fn location(&self) -> Location {
        self.location.borrow().clone()
    }

    fn subscribe(&self, listener: RouteListener) -> ListenerId {
        let id = ListenerId(self.next_listener.get() + 1);
        self.next_listener.set(id.0);
        self.listeners.borrow_mut().insert(id, listener);

        id
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.borrow_mut().remove(&id);
    }
}
