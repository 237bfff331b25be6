use crate::utils::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What a dispatch does when a listener returns an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop at the first failing listener and return its error
    #[default]
    Halt,
    /// Log the error and keep dispatching to the remaining listeners
    Continue,
}

/// Settings for one event registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmitterConfig {
    /// Name used in log lines, falls back to the registry id
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl EmitterConfig {
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

pub struct ConfigManager;

impl ConfigManager {
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EmitterConfig> {
        let path_ref = path.as_ref();
        let extension = path_ref
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| EventError::Config("File has no extension".to_string()))?;

        let config_str = fs::read_to_string(path_ref)?;

        let config: EmitterConfig = match extension {
            "json" => serde_json::from_str(&config_str)?,
            "yaml" | "yml" => serde_yaml::from_str(&config_str)?,
            _ => {
                return Err(EventError::Config(format!(
                    "Unsupported file extension: {}",
                    extension
                )))
            }
        };

        Self::validate_config(&config)?;

        Ok(config)
    }

    fn validate_config(config: &EmitterConfig) -> Result<()> {
        if let Some(label) = &config.label {
            if label.trim().is_empty() {
                return Err(EventError::Config("Label must not be blank".to_string()));
            }
        }

        Ok(())
    }
}
