//! Configuration loading and typed config structures for the anagram service.
//!
//! The canonical configuration lives in `anagram-config.yaml` next to the
//! server binary's working directory. This module defines strongly-typed
//! structs that mirror the YAML structure, and provides a loader that reads
//! the file and applies environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Default config file name, resolved relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "anagram-config.yaml";

/// Environment variable naming an alternative config file.
pub const CONFIG_PATH_ENV: &str = "ANAGRAM_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held a value of the wrong shape.
    #[error("invalid value for {key}: {value}")]
    InvalidOverride {
        /// The environment variable name.
        key: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration.
///
/// Mirrors the structure of `anagram-config.yaml`. Every section is
/// optional and falls back to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Backing word file settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Request timing settings.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ANAGRAM_HOST` overrides `server.host`
    /// - `ANAGRAM_PORT` overrides `server.port`
    /// - `ANAGRAM_WORDS_PATH` overrides `storage.words_path`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::InvalidOverride`] if an override cannot be parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Path of the config file to use: `ANAGRAM_CONFIG` if set, otherwise
    /// `anagram-config.yaml` in the working directory.
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE), PathBuf::from)
    }

    /// Load the file at [`config_path`](Self::config_path). A missing file
    /// yields the defaults (with environment overrides still applied).
    ///
    /// Nothing is logged here, as this usually runs before the subscriber
    /// is installed; callers report the path once logging is up.
    ///
    /// # Errors
    ///
    /// Propagates read, parse, and override errors for a file that exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(&Self::config_path(), |key| std::env::var(key).ok())
    }

    /// Load `path` if it exists, else start from the defaults, then apply
    /// overrides from `lookup`.
    ///
    /// # Errors
    ///
    /// Propagates read, parse, and override errors for a file that exists.
    pub fn load_with<F>(path: &Path, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if path.exists() {
            Self::parse(&std::fs::read_to_string(path)?)?
        } else {
            Self::default()
        };
        config.apply_overrides_from(lookup)?;
        Ok(config)
    }

    /// Override values with process environment variables when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if `ANAGRAM_PORT` is not
    /// a valid port number.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Override values using an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] if the port override is
    /// not a valid `u16`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ANAGRAM_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("ANAGRAM_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::InvalidOverride {
                    key: "ANAGRAM_PORT",
                    value: format!("{port} ({e})"),
                })?;
        }
        if let Some(path) = lookup("ANAGRAM_WORDS_PATH") {
            self.storage.words_path = PathBuf::from(path);
        }
        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Backing word file configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the plain-text word list (one word per line).
    #[serde(default = "default_words_path")]
    pub words_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            words_path: default_words_path(),
        }
    }
}

/// Request timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimingConfig {
    /// Request paths whose processing time is recorded for the stats
    /// endpoint. Other paths still receive the timing header.
    #[serde(default = "default_tracked_endpoints")]
    pub tracked_endpoints: Vec<String>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tracked_endpoints: default_tracked_endpoints(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `pretty` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl LoggingConfig {
    /// Whether JSON log lines were requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

fn default_words_path() -> PathBuf {
    PathBuf::from("words_dataset.txt")
}

fn default_tracked_endpoints() -> Vec<String> {
    vec!["/api/v1/similar".to_owned(), "/api/v1/add-word".to_owned()]
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> String {
    "pretty".to_owned()
}
