//! Application configuration
//!
//! Configuration is layered with the following precedence:
//!
//! 1. Hardcoded defaults (lowest priority)
//! 2. TOML config file (`runboard.toml`, or the file given with `--config`)
//! 3. Environment variables (`RUNBOARD_*` prefix)
//! 4. Command-line flags (highest priority, applied by the caller)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::timeline::DEFAULT_WINDOW_SIZE;

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "runboard.toml";

/// Application configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP service binds to.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// File holding the raw test-run documents.
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,

    /// Version prefix selecting the release to chart; empty selects all.
    #[serde(default)]
    pub release: String,

    /// Number of trailing versions kept in a timeline.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Directory with dashboard assets served at `/`.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            records_path: default_records_path(),
            release: String::new(),
            window_size: default_window_size(),
            static_dir: None,
            log_level: default_log_level(),
        }
    }
}

// Default value functions for serde
fn default_listen_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_records_path() -> PathBuf {
    PathBuf::from("records.json")
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from `path`, or from `runboard.toml` if present.
    ///
    /// An explicitly named file must exist; the default file is optional.
    /// The result is not validated: command-line flags still apply on top, so
    /// callers run [`AppConfig::validate`] once every layer is merged.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.merge_env_vars();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `RUNBOARD_*` environment overrides
    pub fn merge_env_vars(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup("RUNBOARD_LISTEN_ADDRESS") {
            self.listen_address = address;
        }
        if let Some(path) = lookup("RUNBOARD_RECORDS_PATH") {
            self.records_path = PathBuf::from(path);
        }
        if let Some(release) = lookup("RUNBOARD_RELEASE") {
            self.release = release;
        }
        if let Some(window) = lookup("RUNBOARD_WINDOW_SIZE") {
            match window.parse() {
                Ok(size) => self.window_size = size,
                Err(_) => debug!("Ignoring non-numeric RUNBOARD_WINDOW_SIZE={}", window),
            }
        }
        if let Some(level) = lookup("RUNBOARD_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Check every field, reporting all problems at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.window_size == 0 {
            errors.push("window_size must be at least 1".to_string());
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            errors.push(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            ));
        }

        if self.listen_address.trim().is_empty() {
            errors.push("listen_address cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(errors.join("; ")))
        }
    }

    /// Filter directive for the given CLI verbosity
    ///
    /// Without `-v` flags the configured level applies.
    pub fn log_filter(&self, verbose: u8) -> String {
        match verbose {
            0 => self.log_level.clone(),
            1 => "debug".to_string(),
            2 => "trace".to_string(),
            _ => "trace,hyper=debug,tower=debug".to_string(),
        }
    }
}
