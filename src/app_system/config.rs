use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

/// Tunables for the users system.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Records requested per range read. A shorter page ends pagination.
    pub page_size: usize,
    /// Capacity of the service's request channel.
    pub buffer_size: usize,
    /// Records generated into the in-memory store by the demo binary.
    pub seed_users: u64,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            buffer_size: 32,
            seed_users: 240,
        }
    }
}

impl PagerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// - If the file doesn't exist, returns `PagerConfig::default()`.
    /// - Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content, path)
    }

    /// Parses and validates TOML content. `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "page_size must be at least 1".to_string(),
            });
        }
        if self.buffer_size == 0 {
            return Err(ConfigError::ValidationError {
                message: "buffer_size must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = PagerConfig::parse("", Path::new("pager.toml")).unwrap();
        assert_eq!(config, PagerConfig::default());
        assert_eq!(config.page_size, 100);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = PagerConfig::parse("page_size = 25\n", Path::new("pager.toml")).unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.buffer_size, 32);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let err = PagerConfig::parse("page_size = 0\n", Path::new("pager.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let err = PagerConfig::parse("page_size = \"many\"\n", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("user-pager-config-that-does-not-exist.toml");
        assert_eq!(PagerConfig::load(&path).unwrap(), PagerConfig::default());
    }
}
