//! Location and navigation-change notification.
//!
//! The [`Navigator`] plays the part of the address bar: it holds the current
//! fragment (`#/sales/detail/...`), a back history, and the set of handlers
//! to call when the fragment changes. Handlers are registered through
//! [`Navigator::subscribe`], which hands back a [`Subscription`] token;
//! dropping or cancelling the token unregisters the handler.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// The current route fragment, always starting with `#` unless empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub fragment: String,
}

impl Location {
    pub fn new(fragment: &str) -> Self {
        let trimmed = fragment.trim();
        let fragment = if trimmed.is_empty() || trimmed.starts_with('#') {
            trimmed.to_string()
        } else {
            format!("#{}", trimmed)
        };
        Self { fragment }
    }

    pub fn is_empty(&self) -> bool {
        self.fragment.is_empty() || self.fragment == "#"
    }
}

type Handler = Rc<dyn Fn(&Location)>;
type HandlerId = u64;

struct Inner {
    location: RefCell<Location>,
    history: RefCell<Vec<Location>>,
    handlers: RefCell<Vec<(HandlerId, Handler)>>,
    next_id: Cell<HandlerId>,
}

impl Inner {
    fn unsubscribe(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(h, _)| *h != id);
        handlers.len() != before
    }
}

/// Shared handle to the navigation state. Cloning shares the same location.
#[derive(Clone)]
pub struct Navigator {
    inner: Rc<Inner>,
}

impl Navigator {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Rc::new(Inner {
                location: RefCell::new(Location::new(initial)),
                history: RefCell::new(Vec::new()),
                handlers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    pub fn location(&self) -> Location {
        self.inner.location.borrow().clone()
    }

    pub fn can_go_back(&self) -> bool {
        !self.inner.history.borrow().is_empty()
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    /// Register a handler for location changes.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&Location) + 'static,
    {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.handlers.borrow_mut().push((id, Rc::new(handler)));
        Subscription {
            navigator: Rc::downgrade(&self.inner),
            id,
            active: Cell::new(true),
        }
    }

    /// Move to `fragment`. Handlers fire only if the location actually
    /// changed. Returns whether it did.
    pub fn navigate(&self, fragment: &str) -> bool {
        let next = Location::new(fragment);
        {
            let mut current = self.inner.location.borrow_mut();
            if *current == next {
                return false;
            }
            let previous = std::mem::replace(&mut *current, next);
            self.inner.history.borrow_mut().push(previous);
        }
        tracing::debug!(fragment = %self.location().fragment, "location changed");
        self.notify();
        true
    }

    /// Return to the previous location, if any.
    pub fn back(&self) -> bool {
        let Some(previous) = self.inner.history.borrow_mut().pop() else {
            return false;
        };
        *self.inner.location.borrow_mut() = previous;
        self.notify();
        true
    }

    /// Re-announce the current location without changing it.
    pub fn reload(&self) {
        self.notify();
    }

    fn notify(&self) {
        // Snapshot so handlers can navigate or unsubscribe while we iterate.
        let handlers: Vec<Handler> = self
            .inner
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        let location = self.location();
        for handler in handlers {
            handler(&location);
        }
    }
}

/// Registration token returned by [`Navigator::subscribe`].
pub struct Subscription {
    navigator: Weak<Inner>,
    id: HandlerId,
    active: Cell<bool>,
}

impl Subscription {
    pub fn cancel(&self) {
        if self.active.replace(false) {
            if let Some(inner) = self.navigator.upgrade() {
                inner.unsubscribe(self.id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.get() && self.navigator.strong_count() > 0
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
