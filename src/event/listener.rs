//! Listener definitions for the uevent registry.
//!
//! A listener is either a plain callback or an object implementing
//! [`HandleEvent`]. Both are reference counted so the same listener can be
//! registered several times and later removed by identity.

use crate::event::event::Event;
use crate::utils::error::Result;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Signature of a callback listener.
///
/// During `trigger` the slice holds the extra arguments and the return value is
/// ignored. During `change` the slice holds the current value followed by the
/// extra arguments, and `Some(value)` replaces the current value.
pub type ListenerCallback<H, P> = dyn Fn(&Event<'_, H, P>, &[P]) -> Result<Option<P>>;

/// An object able to handle events through a single method.
pub trait HandleEvent<H, P> {
    /// Handle an event. During `change`, `event.value()` holds the current
    /// value and `Some(value)` replaces it.
    fn handle_event(&self, event: &Event<'_, H, P>) -> Result<Option<P>>;
}

/// A registered listener.
pub enum Listener<H, P> {
    Callback(Rc<ListenerCallback<H, P>>),
    Handler(Rc<dyn HandleEvent<H, P>>),
}

impl<H, P> Listener<H, P> {
    /// Wrap a closure as a listener
    pub fn callback<F>(f: F) -> Self
    where
        F: Fn(&Event<'_, H, P>, &[P]) -> Result<Option<P>> + 'static,
    {
        Listener::Callback(Rc::new(f))
    }

    /// Wrap a shared handler object; keep a clone of the `Rc` to inspect it later
    pub fn handler<T>(handler: Rc<T>) -> Self
    where
        T: HandleEvent<H, P> + 'static,
    {
        Listener::Handler(handler)
    }

    /// Identity comparison, two listeners are the same if they share an allocation
    pub fn same_as(&self, other: &Listener<H, P>) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match self {
            Listener::Callback(f) => Rc::as_ptr(f) as *const (),
            Listener::Handler(h) => Rc::as_ptr(h) as *const (),
        }
    }

    /// Invoke for `trigger`
    pub(crate) fn call(&self, event: &Event<'_, H, P>) -> Result<()> {
        match self {
            Listener::Callback(f) => f(event, event.args()).map(|_| ()),
            Listener::Handler(h) => h.handle_event(event).map(|_| ()),
        }
    }

    /// Invoke for `change`, `value` is the current value of the pipeline
    pub(crate) fn transform(&self, event: &Event<'_, H, P>, value: &P) -> Result<Option<P>>
    where
        P: Clone,
    {
        match self {
            Listener::Callback(f) => {
                let mut args = Vec::with_capacity(event.args().len() + 1);
                args.push(value.clone());
                args.extend_from_slice(event.args());
                f(event, &args)
            }
            Listener::Handler(h) => h.handle_event(event),
        }
    }
}

impl<H, P> Clone for Listener<H, P> {
    fn clone(&self) -> Self {
        match self {
            Listener::Callback(f) => Listener::Callback(Rc::clone(f)),
            Listener::Handler(h) => Listener::Handler(Rc::clone(h)),
        }
    }
}

impl<H, P> fmt::Debug for Listener<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Listener::Callback(_) => "Callback",
            Listener::Handler(_) => "Handler",
        };
        write!(f, "Listener::{}({:p})", kind, self.addr())
    }
}

/// A listener as stored in the registry.
///
/// Clones share the `removed` flag, so a snapshot taken by an outer dispatch
/// sees removals made by nested dispatches of the same event.
pub(crate) struct ListenerEntry<H, P> {
    pub(crate) listener: Listener<H, P>,
    /// Removed after the next `trigger` of its event, never used by `change`
    pub(crate) once: bool,
    removed: Rc<Cell<bool>>,
}

impl<H, P> ListenerEntry<H, P> {
    pub(crate) fn new(listener: Listener<H, P>, once: bool) -> Self {
        ListenerEntry {
            listener,
            once,
            removed: Rc::new(Cell::new(false)),
        }
    }

    pub(crate) fn mark_removed(&self) {
        self.removed.set(true);
    }

    pub(crate) fn is_removed(&self) -> bool {
        self.removed.get()
    }
}

impl<H, P> Clone for ListenerEntry<H, P> {
    fn clone(&self) -> Self {
        ListenerEntry {
            listener: self.listener.clone(),
            once: self.once,
            removed: Rc::clone(&self.removed),
        }
    }
}
