//! Configuration errors.

use thiserror::Error;

/// ConfigError is returned when a registration or a configuration source is
/// rejected. Comparisons themselves never fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{type_name} is not a primitive kind")]
    NotPrimitive { type_name: String },

    #[error("{type_name} is a callable or channel type and is never compared")]
    Uncomparable { type_name: String },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("failed to load config from {source_name}: {message}")]
    Load { source_name: String, message: String },
}

impl ConfigError {
    /// Creates a not-primitive error.
    pub fn not_primitive(type_name: impl Into<String>) -> Self {
        ConfigError::NotPrimitive {
            type_name: type_name.into(),
        }
    }

    /// Creates an uncomparable-type error.
    pub fn uncomparable(type_name: impl Into<String>) -> Self {
        ConfigError::Uncomparable {
            type_name: type_name.into(),
        }
    }

    /// Creates an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a config loading error.
    pub fn load(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Load {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}
