//! Trace configuration
//!
//! Resolution order: explicit override (CLI `--file`), then environment,
//! then the built-in default. No variable is required.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::TraceError;
use crate::DEFAULT_LOG_FILE;

/// Overrides the store path
pub const ENV_LOG_PATH: &str = "LLM_DEBUG_LOG";

/// `0`, `false`, `no` or `off` disables trace writing
pub const ENV_ENABLED: &str = "LLM_DEBUG_ENABLED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Location of the store
    pub path: PathBuf,
    /// When false, writers drop every record
    pub enabled: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
            enabled: true,
        }
    }
}

impl TraceConfig {
    /// Default config with the environment applied on top
    pub fn from_env() -> Self {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LOG_PATH).filter(|p| !p.trim().is_empty()) {
            self.path = PathBuf::from(path);
        }
        if let Some(flag) = lookup(ENV_ENABLED) {
            self.enabled = !matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        self
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, TraceError> {
        serde_yaml::from_str(yaml).map_err(|e| TraceError::Config(e.to_string()))
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| TraceError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&content)
    }

    /// Replace the store path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}
