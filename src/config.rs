//! User configuration, read from `<config dir>/darkcalc/config.toml`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::DEFAULT_MAX_ENTRY_LEN;

const APP_DIR: &str = "darkcalc";
const CONFIG_FILE: &str = "config.toml";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Longest operand that can be typed, in characters.
    pub max_entry_len: usize,
    /// How long the error display stays up before the automatic clear.
    pub error_reset_ms: u64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entry_len: DEFAULT_MAX_ENTRY_LEN,
            error_reset_ms: 1500,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, falling back to defaults when no
    /// file exists there.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn error_reset_delay(&self) -> Duration {
        Duration::from_millis(self.error_reset_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.max_entry_len == 0 {
            anyhow::bail!("max_entry_len must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file() {
        let config = Config::parse("error_reset_ms = 250").unwrap();
        assert_eq!(config.error_reset_ms, 250);
        assert_eq!(config.max_entry_len, 9);
        assert_eq!(config.error_reset_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_full_file() {
        let config = Config::parse(
            r#"
            max_entry_len = 12
            error_reset_ms = 2000
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.max_entry_len, 12);
        assert_eq!(config.error_reset_ms, 2000);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_zero_entry_length_rejected() {
        assert!(Config::parse("max_entry_len = 0").is_err());
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(Config::parse("error_reset_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("darkcalc-missing-config.toml");
        assert!(Config::load_from(&path).is_err());
    }
}
