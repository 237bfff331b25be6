//! Event module for uevent.
//!
//! This module provides the per-host listener registry, the event context
//! handed to listeners and the [`EventEmitter`] trait that gives any type the
//! `on`/`off`/`once`/`trigger`/`change` operations.

pub mod emitter;
pub mod event;
pub mod listener;
pub mod registry;

pub use emitter::Emitter;
pub use emitter::EventEmitter;
pub use event::Event;
pub use listener::HandleEvent;
pub use listener::Listener;
pub use listener::ListenerCallback;
pub use registry::EventRegistry;
