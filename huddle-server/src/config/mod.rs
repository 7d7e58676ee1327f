//! Configuration module for huddle-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use huddle_core::config::{HuddleConfig, SchedulerConfig, ServerConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and validate the configuration.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn load(&self) -> Result<HuddleConfig, ConfigError> {
        let file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => Self::parse(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.build(file_config)
    }

    fn parse(content: &str) -> Result<FileConfig, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn build(&self, mut file_config: FileConfig) -> Result<HuddleConfig, ConfigError> {
        // Apply CLI overrides
        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        Self::validate(&file_config)?;

        Ok(HuddleConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            scheduler: SchedulerConfig {
                interval: Duration::from_secs(file_config.scheduler.interval_secs),
                tiebreak_window: time::Duration::hours(i64::from(
                    file_config.scheduler.tiebreak_window_hours,
                )),
            },
        })
    }

    fn validate(config: &FileConfig) -> Result<(), ConfigError> {
        let max_interval_secs = SchedulerConfig::MAX_INTERVAL.as_secs();
        if !(1..=max_interval_secs).contains(&config.scheduler.interval_secs) {
            return Err(ConfigError::ValidationError(format!(
                "scheduler.interval_secs must be between 1 and {max_interval_secs}"
            )));
        }
        let max_window_hours = SchedulerConfig::MAX_TIEBREAK_WINDOW.whole_hours();
        if !(1..=max_window_hours).contains(&i64::from(config.scheduler.tiebreak_window_hours)) {
            return Err(ConfigError::ValidationError(format!(
                "scheduler.tiebreak_window_hours must be between 1 and {max_window_hours}"
            )));
        }
        Ok(())
    }
}

/// Get the database URL from the environment.
pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}
