//! Configuration settings for the INGRES query engine.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub resolver: ResolverConfig,
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::ReadFile)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations or use defaults.
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from("ingres.toml"),
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .map(|p| p.join("ingres/config.toml"))
                .unwrap_or_default(),
            dirs::home_dir()
                .map(|p| p.join(".ingres/config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.store.database_path.trim().is_empty() {
            return Err(ConfigError::MissingField("store.database_path".to_string()).into());
        }

        if !(2000..=2099).contains(&self.resolver.assessment_year) {
            return Err(ConfigError::Invalid(format!(
                "assessment_year must be within 2000..=2099, got {}",
                self.resolver.assessment_year
            ))
            .into());
        }

        if self.resolver.location_limit == 0 || self.resolver.ranking_limit == 0 {
            return Err(ConfigError::Invalid("result limits must be > 0".to_string()).into());
        }

        if self.resolver.default_location.trim().is_empty() {
            return Err(ConfigError::MissingField("resolver.default_location".to_string()).into());
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be > 0".to_string()).into());
        }

        let prefix = &self.server.prefix;
        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            return Err(ConfigError::Invalid(format!(
                "server.prefix must look like \"/api\", got {:?}",
                prefix
            ))
            .into());
        }

        Ok(())
    }

    /// Expand the database path.
    pub fn database_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.store.database_path);
        PathBuf::from(expanded.as_ref())
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite assessment database
    pub database_path: String,
    /// Busy timeout for the reference catalog connection, in milliseconds
    pub catalog_timeout_ms: u64,
    /// Busy timeout for resolution connections, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: "data/ingres_mock.db".to_string(),
            catalog_timeout_ms: 3000,
            busy_timeout_ms: 5000,
        }
    }
}

impl StoreConfig {
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_millis(self.catalog_timeout_ms)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Query resolution defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Most recent assessment year; scopes every non-historical query
    pub assessment_year: i64,
    /// Location used by status queries that name none
    pub default_location: String,
    /// Maximum blocks returned by location-scoped queries
    pub location_limit: usize,
    /// Maximum blocks returned by critical/safe rankings
    pub ranking_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            assessment_year: 2024,
            default_location: "Delhi".to_string(),
            location_limit: 10,
            ranking_limit: 15,
        }
    }
}

/// REST server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub port: u16,
    /// Enable permissive CORS
    pub enable_cors: bool,
    /// Route prefix for the API
    pub prefix: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
            prefix: "/api".to_string(),
        }
    }
}
