//! Declarative differ configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path as FsPath;

use super::error::ConfigError;

/// DiffConfig is the file form of the settings that need no code.
///
/// ```yaml
/// omit:
///   - .Metadata.ResourceVersion
///   - Timestamp
///   - .Status.*
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Omission patterns, see [`Differ::omit_path`](crate::Differ::omit_path).
    pub omit: Vec<String>,
}

impl DiffConfig {
    /// Parses a configuration from YAML (JSON is accepted too).
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::load("<inline>", e.to_string()))
    }

    /// Loads a configuration file.
    pub fn load(path: impl AsRef<FsPath>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::load(&name, e.to_string()))?;
        let config: DiffConfig =
            serde_yaml::from_str(&text).map_err(|e| ConfigError::load(&name, e.to_string()))?;
        tracing::debug!(path = %name, omit = config.omit.len(), "loaded diff config");
        Ok(config)
    }
}
