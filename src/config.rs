//! Layered configuration.
//!
//! `defaults/structura.default.toml` is embedded into the binary and is always
//! the base layer. [`Loader`] stacks files, environment variables and single
//! overrides on top before deserializing into [`StructuraConfig`].

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, Map, ValueKind};
use serde::Deserialize;

use crate::dialect::Dialect;

const DEFAULT_TOML: &str = include_str!("../defaults/structura.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "structura.toml";

/// Prefix of environment overrides, e.g. `STRUCTURA__ENGINE__BASE_URL`.
pub const ENV_PREFIX: &str = "STRUCTURA";

#[derive(Debug, Clone, Deserialize)]
pub struct StructuraConfig {
    pub engine: EngineConfig,
    pub session: SessionConfig,
    pub viewer: ViewerConfig,
    pub logging: LoggingConfig,
}

/// Where and how to reach the analysis engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub dialect: Dialect,
    pub analyze_on_start: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
    pub tick_rate_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
}

impl LoggingConfig {
    /// The configured log file, or `structura.log` in the temp directory.
    pub fn file_path(&self) -> PathBuf {
        if self.file.trim().is_empty() {
            std::env::temp_dir().join("structura.log")
        } else {
            PathBuf::from(&self.file)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may not exist.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `STRUCTURA__SECTION__KEY` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_environment(None)
    }

    fn with_environment(mut self, vars: Option<Map<String, String>>) -> Self {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .source(vars);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command-line flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<StructuraConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<StructuraConfig, ConfigError> {
    Loader::new().build()
}
