//! Event emitter capability for host types.
//!
//! A host type embeds an [`EventRegistry`] and implements [`EventEmitter`] by
//! returning it from [`EventEmitter::events`]. Every other operation is
//! provided and forwards to that registry, so each host value owns its own
//! independent set of listeners.

use crate::config::EmitterConfig;
use crate::event::event::Event;
use crate::event::listener::Listener;
use crate::event::registry::EventRegistry;
use crate::utils::error::Result;
use serde_json::Value;

/// Gives a host type `on`, `off`, `once`, `trigger` and `change`.
pub trait EventEmitter: Sized {
    /// Type of extra arguments and of values passed through `change`
    type Payload: Clone;

    /// The registry owned by this host value
    fn events(&self) -> &EventRegistry<Self, Self::Payload>;

    /// Build a callback listener typed for this host.
    ///
    /// Prefer this over [`Listener::callback`] when the host type is at hand:
    /// it fixes the closure's argument types up front.
    fn listener<F>(f: F) -> Listener<Self, Self::Payload>
    where
        F: Fn(&Event<'_, Self, Self::Payload>, &[Self::Payload]) -> Result<Option<Self::Payload>> + 'static,
    {
        Listener::callback(f)
    }

    /// Register `listener` for each whitespace-separated name in `events`
    fn on(&self, events: &str, listener: Listener<Self, Self::Payload>) -> &Self {
        self.events().add(events, listener, false);
        self
    }

    /// Register one listener per `(name, listener)` pair
    fn on_map<I, K>(&self, map: I) -> &Self
    where
        I: IntoIterator<Item = (K, Listener<Self, Self::Payload>)>,
        K: Into<String>,
    {
        self.events().add_map(map, false);
        self
    }

    /// Like [`on`](EventEmitter::on), but the listener is dropped after the
    /// next `trigger` of the event and is never run by `change`
    fn once(&self, events: &str, listener: Listener<Self, Self::Payload>) -> &Self {
        self.events().add(events, listener, true);
        self
    }

    /// Like [`on_map`](EventEmitter::on_map), with every entry marked `once`
    fn once_map<I, K>(&self, map: I) -> &Self
    where
        I: IntoIterator<Item = (K, Listener<Self, Self::Payload>)>,
        K: Into<String>,
    {
        self.events().add_map(map, true);
        self
    }

    /// Remove listeners from the named events.
    ///
    /// `None` empties the named events. `Some(listener)` removes its first
    /// registration under each name. Unknown names and listeners are ignored.
    fn off(&self, events: &str, listener: Option<&Listener<Self, Self::Payload>>) -> &Self {
        self.events().remove(events, listener);
        self
    }

    /// Remove the first registration of each `(name, listener)` pair
    fn off_map<I, K>(&self, map: I) -> &Self
    where
        I: IntoIterator<Item = (K, Listener<Self, Self::Payload>)>,
        K: AsRef<str>,
    {
        self.events().remove_map(map);
        self
    }

    /// Remove every listener of every event
    fn off_all(&self) -> &Self {
        self.events().clear();
        self
    }

    /// Dispatch `event` to its listeners and return the event context
    fn trigger(&self, event: &str, args: Vec<Self::Payload>) -> Result<Event<'_, Self, Self::Payload>> {
        self.events().trigger(self, event, args)
    }

    /// Run `value` through the listeners of `event` and return the result
    fn change(&self, event: &str, value: Self::Payload, args: Vec<Self::Payload>) -> Result<Self::Payload> {
        self.events().change(self, event, value, args)
    }
}

/// A host with no state besides its listeners.
#[derive(Debug)]
pub struct Emitter<P = Value> {
    events: EventRegistry<Emitter<P>, P>,
}

impl<P> Emitter<P> {
    /// Create an emitter with the default config
    pub fn new() -> Self {
        Emitter {
            events: EventRegistry::new(),
        }
    }

    /// Create an emitter whose registry uses `config`
    pub fn with_config(config: EmitterConfig) -> Self {
        Emitter {
            events: EventRegistry::with_config(config),
        }
    }
}

impl<P> Default for Emitter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Clone> EventEmitter for Emitter<P> {
    type Payload = P;

    fn events(&self) -> &EventRegistry<Self, P> {
        &self.events
    }
}
