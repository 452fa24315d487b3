use crate::{domain::Location, host::ListenerId};
use std::rc::Rc;

pub type RouteListener = Rc<dyn Fn(&Location)>;

///
/// Navigation
/// Client-side router. adslot observes it and never navigates.
///

pub trait Navigation {
    fn location(&self) -> Location;

    /// Fires after each client-side route transition.
    fn subscribe(&self, listener: RouteListener) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId);
}
