//! Configuration loading and management
//!
//! [`ServerConfig`] is read from an optional YAML file, then individual
//! fields are overridden from the environment:
//!
//! | Env Var                      | Field                  | Default                     |
//! |------------------------------|------------------------|-----------------------------|
//! | `FLEET_CONFIG`               | path of the YAML file  | none                        |
//! | `FLEET_HOST`                 | `host`                 | `0.0.0.0`                   |
//! | `FLEET_PORT`                 | `port`                 | `3000`                      |
//! | `FLEET_API_PREFIX`           | `api_prefix`           | `/api`                      |
//! | `FLEET_REQUEST_TIMEOUT_SECS` | `request_timeout_secs` | `30`                        |
//! | `FLEET_STORAGE`              | `storage`              | `in_memory`                 |
//! | `MONGODB_URI`                | `mongodb.uri`          | `mongodb://localhost:27017` |
//! | `MONGODB_DATABASE`           | `mongodb.database`     | `fleet`                     |

use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Env var holding the YAML config path
pub const CONFIG_PATH_ENV: &str = "FLEET_CONFIG";

/// Which backend serves both stores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageKind {
    #[default]
    InMemory,
    Mongodb,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(StorageKind::InMemory),
            "mongodb" | "mongo" => Ok(StorageKind::Mongodb),
            other => Err(format!(
                "unknown storage backend '{}', expected 'in_memory' or 'mongodb'",
                other
            )),
        }
    }
}

/// MongoDB connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "fleet".to_string(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,

    /// Bind port
    pub port: u16,

    /// Prefix for `/trucks` and `/contracts`
    pub api_prefix: String,

    /// Requests running longer get a 408
    pub request_timeout_secs: u64,

    pub storage: StorageKind,

    pub mongodb: MongoConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            api_prefix: "/api".to_string(),
            request_timeout_secs: 30,
            storage: StorageKind::default(),
            mongodb: MongoConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            file: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse_yaml(&content, &path.display().to_string())
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_yaml(yaml, "<inline>")
    }

    fn parse_yaml(yaml: &str, file: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `FLEET_CONFIG` (if set) and apply environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injectable variable lookup
    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => {
                tracing::info!(path = %path, "loading configuration file");
                Self::from_yaml_file(path)?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Override fields from environment-style variables
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("FLEET_HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("FLEET_PORT") {
            self.port = parse_value("FLEET_PORT", &port)?;
        }
        if let Some(prefix) = lookup("FLEET_API_PREFIX") {
            self.api_prefix = prefix;
        }
        if let Some(secs) = lookup("FLEET_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_value("FLEET_REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(storage) = lookup("FLEET_STORAGE") {
            self.storage = parse_value("FLEET_STORAGE", &storage)?;
        }
        if let Some(uri) = lookup("MONGODB_URI") {
            self.mongodb.uri = uri;
        }
        if let Some(database) = lookup("MONGODB_DATABASE") {
            self.mongodb.database = database;
        }
        self.validate()
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "api_prefix".to_string(),
                value: self.api_prefix.clone(),
                message: "must be empty or start with '/'".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs".to_string(),
                value: "0".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// `host:port` for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_value<T>(field: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
        message: e.to_string(),
    })
}
