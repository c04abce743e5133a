//! Error types for assertions and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// A failed check.
///
/// Carries a constant [`kind`](AssertionError::kind) tag so tooling can tell
/// assertion failures apart from ordinary errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AssertionError {
    message: String,
}

impl AssertionError {
    pub const KIND: &'static str = "AssertionError";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> &'static str {
        Self::KIND
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a single assertion.
pub type AssertResult = Result<(), AssertionError>;

/// Errors loading an [`AssertConfig`](crate::AssertConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
