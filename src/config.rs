//! Assertion configuration, loadable from TOML.
//!
//! ```toml
//! [format]
//! max_depth = 3
//! max_items = 10
//! max_string_width = 80
//! ```

use crate::errors::ConfigError;
use crate::format::FormatOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for an [`Asserter`](crate::Asserter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssertConfig {
    /// How operands are rendered in failure messages.
    pub format: FormatOptions,
}

impl AssertConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no assertion config, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), ?config, "loaded assertion config");
        Ok(config)
    }

    /// Replace the formatting options.
    pub fn with_format(mut self, format: FormatOptions) -> Self {
        self.format = format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_nonexistent_returns_default() {
        let config = AssertConfig::load(Path::new("/nonexistent/assert.toml")).unwrap();
        assert_eq!(config, AssertConfig::default());
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[format]
max_depth = 2
max_string_width = 40
"#
        )
        .unwrap();

        let config = AssertConfig::load(file.path()).unwrap();
        assert_eq!(config.format.max_depth, 2);
        assert_eq!(config.format.max_string_width, 40);
        // Unspecified fields keep their defaults.
        assert_eq!(config.format.max_items, FormatOptions::default().max_items);
    }

    #[test]
    fn test_load_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let config = AssertConfig::load(file.path()).unwrap();
        assert_eq!(config, AssertConfig::default());
    }

    #[test]
    fn test_load_invalid_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[format]\nmax_depth = \"deep\"").unwrap();

        let error = AssertConfig::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
        assert!(error.to_string().starts_with("failed to parse"));
    }
}
