//! Configuration management
//!
//! Loads the service configuration from `config.toml` with environment
//! overrides (`SCOPED_FS_LOCK__TIMEOUT=250`, ...). The lock timeout is a
//! single (value, unit) pair applied to every lock acquisition and release.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::Privilege;

const ENV_PREFIX: &str = "SCOPED_FS";

/// Complete service configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub lock: LockConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct LockConfig {
    pub timeout: u64,
    pub unit: TimeUnit,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the filesystem storage
    pub root: String,
}

/// Seed data for the static user/application/rights directory
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub applications: Vec<ApplicationEntry>,
    #[serde(default)]
    pub rights: Vec<RightEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationEntry {
    pub name: String,
    #[serde(default)]
    pub perimeters: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RightEntry {
    pub user: String,
    pub application: String,
    pub perimeter: String,
    pub privileges: Vec<Privilege>,
}

impl ServiceConfig {
    /// Load configuration from `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the given file stem with environment overrides
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::finish(settings)
    }

    /// Parse configuration from TOML text, without environment overrides
    pub fn from_toml(text: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, config::ConfigError> {
        let config: ServiceConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.lock.timeout == 0 {
            return Err(config::ConfigError::Message(
                "lock.timeout must be greater than 0".into(),
            ));
        }

        if self.storage.root.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "storage.root cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl LockConfig {
    /// The configured timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        self.unit.duration(self.timeout)
    }
}

impl TimeUnit {
    pub fn duration(&self, value: u64) -> Duration {
        match self {
            TimeUnit::Nanoseconds => Duration::from_nanos(value),
            TimeUnit::Microseconds => Duration::from_micros(value),
            TimeUnit::Milliseconds => Duration::from_millis(value),
            TimeUnit::Seconds => Duration::from_secs(value),
            TimeUnit::Minutes => Duration::from_secs(value.saturating_mul(60)),
        }
    }
}

impl StorageConfig {
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }
}
