//! Listener registry for one host.
//!
//! The registry keeps, per event name, an ordered list of listeners and runs the
//! `trigger` and `change` dispatch loops over it. State is single-threaded: a
//! host and its listeners live on one thread and dispatch never yields.

use crate::config::{EmitterConfig, FailurePolicy};
use crate::event::event::Event;
use crate::event::listener::{Listener, ListenerEntry};
use crate::utils::error::{EventError, Result};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Per-host listener registry.
///
/// `H` is the host type handed to listeners as the event target, `P` the type
/// of the extra arguments and of the `change` value.
pub struct EventRegistry<H, P = Value> {
    id: Uuid,
    name: String,
    config: EmitterConfig,
    listeners: RefCell<HashMap<String, Vec<ListenerEntry<H, P>>>>,
}

impl<H, P> EventRegistry<H, P> {
    /// Create a registry with the default config
    pub fn new() -> Self {
        Self::with_config(EmitterConfig::default())
    }

    /// Create a registry, labelled and failing as `config` says
    pub fn with_config(config: EmitterConfig) -> Self {
        let id = Uuid::new_v4();
        let name = config.label.clone().unwrap_or_else(|| id.to_string());
        EventRegistry {
            id,
            name,
            config,
            listeners: RefCell::new(HashMap::new()),
        }
    }

    /// Unique id of this registry, used in log lines when no label is set
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Config the registry was built with
    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Append `listener` to every whitespace-separated name in `names`
    pub fn add(&self, names: &str, listener: Listener<H, P>, once: bool) {
        let mut listeners = self.listeners.borrow_mut();
        for name in names.split_whitespace() {
            log::debug!("[{}] adding {:?} to '{}' (once: {})", self.name, listener, name, once);
            listeners
                .entry(name.to_string())
                .or_default()
                .push(ListenerEntry::new(listener.clone(), once));
        }
    }

    /// Append each `(name, listener)` pair, names are taken verbatim
    pub fn add_map<I, K>(&self, pairs: I, once: bool)
    where
        I: IntoIterator<Item = (K, Listener<H, P>)>,
        K: Into<String>,
    {
        let mut listeners = self.listeners.borrow_mut();
        for (name, listener) in pairs {
            let name = name.into();
            log::debug!("[{}] adding {:?} to '{}' (once: {})", self.name, listener, name, once);
            listeners
                .entry(name)
                .or_default()
                .push(ListenerEntry::new(listener, once));
        }
    }

    /// Remove listeners from every whitespace-separated name in `names`.
    ///
    /// Without a listener the named lists are emptied. With one, only its first
    /// registration under each name is removed.
    pub fn remove(&self, names: &str, listener: Option<&Listener<H, P>>) {
        let mut listeners = self.listeners.borrow_mut();
        for name in names.split_whitespace() {
            let Some(list) = listeners.get_mut(name) else {
                continue;
            };
            match listener {
                Some(listener) => Self::remove_first(list, listener),
                None => {
                    log::debug!("[{}] clearing '{}'", self.name, name);
                    list.drain(..).for_each(|entry| entry.mark_removed());
                }
            }
        }
    }

    /// Remove the first registration of each `(name, listener)` pair
    pub fn remove_map<I, K>(&self, pairs: I)
    where
        I: IntoIterator<Item = (K, Listener<H, P>)>,
        K: AsRef<str>,
    {
        let mut listeners = self.listeners.borrow_mut();
        for (name, listener) in pairs {
            if let Some(list) = listeners.get_mut(name.as_ref()) {
                Self::remove_first(list, &listener);
            }
        }
    }

    fn remove_first(list: &mut Vec<ListenerEntry<H, P>>, listener: &Listener<H, P>) {
        if let Some(index) = list.iter().position(|entry| entry.listener.same_as(listener)) {
            list.remove(index).mark_removed();
        }
    }

    /// Drop every listener of every event
    pub fn clear(&self) {
        log::debug!("[{}] clearing all listeners", self.name);
        for (_, list) in self.listeners.borrow_mut().drain() {
            list.iter().for_each(|entry| entry.mark_removed());
        }
    }

    /// Run every listener of `event_type` in registration order.
    ///
    /// Listeners are taken from a snapshot made before the first one runs.
    /// Afterwards every `once` entry of the event is dropped, including those
    /// that were not reached because propagation stopped or a listener failed,
    /// and those registered while the dispatch was running. A `once` entry
    /// already removed by a nested dispatch is skipped.
    pub fn trigger<'a>(&self, target: &'a H, event_type: &str, args: Vec<P>) -> Result<Event<'a, H, P>> {
        let event = Event::new(target, event_type, args);
        let snapshot = self.snapshot(event_type);
        if snapshot.is_empty() {
            return Ok(event);
        }

        log::trace!("[{}] trigger '{}' to {} listener(s)", self.name, event_type, snapshot.len());

        let mut outcome = Ok(());
        for entry in &snapshot {
            if entry.once && entry.is_removed() {
                continue;
            }
            if let Err(err) = entry.listener.call(&event) {
                if let Err(err) = self.on_failure(event_type, err) {
                    outcome = Err(err);
                    break;
                }
            }
            if event.is_propagation_stopped() {
                log::trace!("[{}] propagation of '{}' stopped", self.name, event_type);
                break;
            }
        }

        self.sweep_once(event_type);

        outcome.map(|_| event)
    }

    /// Pass `value` through every non-`once` listener of `event_type`.
    ///
    /// Each listener sees the value returned by the previous one. Listeners
    /// added while the pipeline runs are not visited.
    pub fn change(&self, target: &H, event_type: &str, value: P, args: Vec<P>) -> Result<P>
    where
        P: Clone,
    {
        let len = self.listener_count(event_type);
        if len == 0 {
            return Ok(value);
        }

        log::trace!("[{}] change '{}' through {} listener(s)", self.name, event_type, len);

        let event = Event::with_value(target, event_type, value.clone(), args);
        let mut current = value;
        for index in 0..len {
            let Some(entry) = self.entry_at(event_type, index) else {
                break;
            };
            if entry.once {
                continue;
            }

            match entry.listener.transform(&event, &current) {
                Ok(Some(next)) => {
                    event.set_value(next.clone());
                    current = next;
                }
                Ok(None) => {}
                Err(err) => self.on_failure(event_type, err)?,
            }

            if event.is_propagation_stopped() {
                log::trace!("[{}] propagation of '{}' stopped", self.name, event_type);
                break;
            }
        }

        Ok(current)
    }

    /// Number of listeners registered for `event_type`, `once` entries included
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.listeners.borrow().get(event_type).map_or(0, |v| v.len())
    }

    /// Number of listeners across all events
    pub fn total_listener_count(&self) -> usize {
        self.listeners.borrow().values().map(|v| v.len()).sum()
    }

    /// Whether `event_type` has at least one listener
    pub fn has_listeners(&self, event_type: &str) -> bool {
        self.listener_count(event_type) > 0
    }

    /// Names with at least one listener, sorted
    pub fn event_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    fn snapshot(&self, event_type: &str) -> Vec<ListenerEntry<H, P>> {
        self.listeners
            .borrow()
            .get(event_type)
            .cloned()
            .unwrap_or_default()
    }

    fn entry_at(&self, event_type: &str, index: usize) -> Option<ListenerEntry<H, P>> {
        self.listeners
            .borrow()
            .get(event_type)
            .and_then(|list| list.get(index))
            .cloned()
    }

    fn sweep_once(&self, event_type: &str) {
        if let Some(list) = self.listeners.borrow_mut().get_mut(event_type) {
            list.retain(|entry| {
                if entry.once {
                    entry.mark_removed();
                }
                !entry.once
            });
        }
    }

    fn on_failure(&self, event_type: &str, err: EventError) -> Result<()> {
        match self.config.failure_policy {
            FailurePolicy::Halt => Err(err),
            FailurePolicy::Continue => {
                log::error!("[{}] listener of '{}' failed: {:?}", self.name, event_type, err);
                Ok(())
            }
        }
    }
}

impl<H, P> Default for EventRegistry<H, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H, P> fmt::Debug for EventRegistry<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("config", &self.config)
            .field("events", &self.event_names())
            .finish()
    }
}
