//! CLI configuration.
//!
//! Read from `<config dir>/kql/config.toml` unless a path is given:
//!
//! ```toml
//! format = "json"
//! color = false
//! log = "kql=debug"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{KqlError, KqlResult};

/// How the CLI prints rendered statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Main CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KqlConfig {
    /// Output format
    pub format: OutputFormat,

    /// Colorize terminal output
    pub color: bool,

    /// Log filter directive, overridden by `RUST_LOG`
    pub log: String,
}

impl Default for KqlConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            log: "warn".to_string(),
        }
    }
}

impl KqlConfig {
    /// Create a new configuration builder
    pub fn builder() -> KqlConfigBuilder {
        KqlConfigBuilder::default()
    }

    /// Default config file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kql").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> KqlResult<Self> {
        toml::from_str(text).map_err(|e| KqlError::Config(e.to_string()))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields defaults.
    pub fn load(path: Option<&Path>) -> KqlResult<Self> {
        match path {
            Some(path) => Self::from_toml(&std::fs::read_to_string(path)?),
            None => match Self::default_path() {
                Some(path) if path.exists() => {
                    tracing::debug!(path = %path.display(), "loading config");
                    Self::from_toml(&std::fs::read_to_string(&path)?)
                }
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Builder for KqlConfig
#[derive(Debug, Default)]
pub struct KqlConfigBuilder {
    config: KqlConfig,
}

impl KqlConfigBuilder {
    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    /// Enable or disable colors
    pub fn color(mut self, color: bool) -> Self {
        self.config.color = color;
        self
    }

    /// Set the log filter directive
    pub fn log(mut self, directive: impl Into<String>) -> Self {
        self.config.log = directive.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> KqlConfig {
        self.config
    }
}
