//! uevent gives any type its own listener registry.
//!
//! Embed an [`EventRegistry`] in a host type, implement [`EventEmitter`] and the
//! host gains `on`, `off`, `once`, `trigger` and `change`:
//!
//! ```
//! use std::cell::Cell;
//! use uevent::{EventEmitter, EventRegistry, Listener};
//!
//! struct Counter {
//!     count: Cell<i64>,
//!     events: EventRegistry<Counter, i64>,
//! }
//!
//! impl EventEmitter for Counter {
//!     type Payload = i64;
//!
//!     fn events(&self) -> &EventRegistry<Self, i64> {
//!         &self.events
//!     }
//! }
//!
//! let counter = Counter { count: Cell::new(0), events: EventRegistry::new() };
//! let bump = Counter::listener(|event, args| {
//!     let counter = event.target();
//!     counter.count.set(counter.count.get() + args[0]);
//!     Ok(None)
//! });
//! let clamp = Listener::<Counter, i64>::callback(|_, args| Ok(Some(args[0].min(10))));
//!
//! counter.on("bump", bump).on("limit", clamp);
//! counter.trigger("bump", vec![3]).unwrap();
//!
//! assert_eq!(counter.count.get(), 3);
//! assert_eq!(counter.change("limit", 42, vec![]).unwrap(), 10);
//! ```
//!
//! Dispatch is synchronous and single-threaded. Listeners run in registration
//! order and may call back into the host they were triggered on.

pub mod config;
pub mod event;
pub mod utils;

pub use config::{ConfigManager, EmitterConfig, FailurePolicy};
pub use event::{Emitter, Event, EventEmitter, EventRegistry, HandleEvent, Listener, ListenerCallback};
pub use utils::error::{EventError, Result};
