//! Per-invocation handling options.
//!
//! # Example YAML
//!
//! ```yaml
//! help: true
//! version: "naval_fate 2.0"
//! options_first: false
//! exit: false
//! ```
//!
//! Every key is optional; missing keys take their defaults.

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Controls how an argv is handled against a usage doc.
///
/// # Examples
///
/// ```
/// use usage_pattern_parser::HandlerConfig;
///
/// let config = HandlerConfig::default()
///     .with_version("prog 1.0")
///     .with_options_first(true);
/// assert!(config.help);
/// assert_eq!(config.version.as_deref(), Some("prog 1.0"));
/// assert!(!config.exit);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Answer `-h`/`--help` with the usage doc instead of matching.
    pub help: bool,
    /// Answer `--version` with this string instead of matching.
    pub version: Option<String>,
    /// Treat everything from the first positional on as positional.
    pub options_first: bool,
    /// Print the output and terminate the process on anything but a match.
    pub exit: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            help: true,
            version: None,
            options_first: false,
            exit: false,
        }
    }
}

impl HandlerConfig {
    pub fn with_help(mut self, help: bool) -> Self {
        self.help = help;
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_options_first(mut self, options_first: bool) -> Self {
        self.options_first = options_first;
        self
    }

    pub fn with_exit(mut self, exit: bool) -> Self {
        self.exit = exit;
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be written, or
    /// [`ConfigError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: HandlerConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert_eq!(config, HandlerConfig::default().with_version("1.0"));
    }

    #[test]
    fn test_full_yaml() {
        let yaml = "help: false\nversion: null\noptions_first: true\nexit: true\n";
        let config: HandlerConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.help);
        assert!(config.version.is_none());
        assert!(config.options_first);
        assert!(config.exit);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("handler.yml");
        let config = HandlerConfig::default().with_help(false).with_version("2.0");
        config.save(&path).unwrap();
        assert_eq!(HandlerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = HandlerConfig::load("/nonexistent/handler.yml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
