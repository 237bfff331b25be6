//! Event context handed to listeners.
//!
//! One [`Event`] is built per `trigger`/`change` call and shared by reference
//! with every listener invoked during that call.

use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::fmt;

/// Context of a single dispatch.
///
/// The default-prevented and propagation-stopped flags can only be raised.
/// Once set they stay set for the lifetime of the context.
pub struct Event<'a, H, P> {
    target: &'a H,
    event_type: String,
    args: Vec<P>,
    value: RefCell<Option<P>>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
    timestamp: DateTime<Utc>,
}

impl<'a, H, P> Event<'a, H, P> {
    /// Create a context for `trigger`
    pub fn new(target: &'a H, event_type: impl Into<String>, args: Vec<P>) -> Self {
        Event {
            target,
            event_type: event_type.into(),
            args,
            value: RefCell::new(None),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
            timestamp: Utc::now(),
        }
    }

    /// Create a context for `change`, seeded with the value to transform
    pub fn with_value(
        target: &'a H,
        event_type: impl Into<String>,
        value: P,
        args: Vec<P>,
    ) -> Self {
        let event = Event::new(target, event_type, args);
        *event.value.borrow_mut() = Some(value);
        event
    }

    /// The host the event was dispatched on
    pub fn target(&self) -> &'a H {
        self.target
    }

    /// Name the event was dispatched under
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Extra positional arguments given to `trigger`/`change`
    pub fn args(&self) -> &[P] {
        &self.args
    }

    /// When the context was created
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Current value of a `change` pipeline, `None` during `trigger`
    pub fn value(&self) -> Option<P>
    where
        P: Clone,
    {
        self.value.borrow().clone()
    }

    pub(crate) fn set_value(&self, value: P) {
        *self.value.borrow_mut() = Some(value);
    }

    /// Flag the default action of the event as cancelled
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether a listener called `prevent_default`
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    /// Skip every listener after the current one for this dispatch
    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl<H, P: fmt::Debug> fmt::Debug for Event<'_, H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("event_type", &self.event_type)
            .field("args", &self.args)
            .field("value", &self.value)
            .field("default_prevented", &self.default_prevented.get())
            .field("propagation_stopped", &self.propagation_stopped.get())
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}
