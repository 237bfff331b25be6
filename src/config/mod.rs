pub mod config;

pub use config::{ConfigManager, EmitterConfig, FailurePolicy};
