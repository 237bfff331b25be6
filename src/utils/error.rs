//! Error types for uevent.

use thiserror::Error;

/// Errors raised by the event registry and its configuration layer.
#[derive(Debug, Error)]
pub enum EventError {
    /// A registered listener failed while handling an event
    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlSerialization(#[from] serde_yaml::Error),
}

impl EventError {
    /// Shorthand for a handler failure, for use inside listeners
    pub fn handler(message: impl Into<String>) -> Self {
        EventError::Handler(message.into())
    }
}

pub type Result<T> = std::result::Result<T, EventError>;
