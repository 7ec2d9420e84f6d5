//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod auth;
pub mod hasher;
pub mod logging;
pub mod notifier;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::app::ServerConfig;
pub use self::auth::AuthConfig;
pub use self::hasher::HasherConfig;
pub use self::logging::LoggingConfig;
pub use self::notifier::NotifierConfig;
pub use self::session::{SessionConfig, StoreBackend};

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token signing settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Refresh-secret hashing cost.
    #[serde(default)]
    pub hasher: HasherConfig,
    /// Session store settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Anomaly webhook settings.
    #[serde(default)]
    pub notifier: NotifierConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database connection pool configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL.
    #[serde(default)]
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
    /// Idle connection timeout in seconds.
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Apply pending migrations at startup.
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_seconds: default_connect_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            run_migrations: default_true(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `TOKENWARDEN_`, e.g.
    /// `TOKENWARDEN_AUTH__SIGNING_SECRET`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENWARDEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Cross-section checks that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        self.auth.validate()?;

        if self.session.store == StoreBackend::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url must be set when session.store = \"postgres\"",
            ));
        }
        if self.session.call_timeout_ms == 0 {
            return Err(AppError::configuration(
                "session.call_timeout_ms must be positive",
            ));
        }
        if self.notifier.enabled && self.notifier.base_url.is_empty() {
            return Err(AppError::configuration(
                "notifier.base_url must be set when the notifier is enabled",
            ));
        }
        Ok(())
    }
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.signing_secret = "s".repeat(48);
        config.session.store = StoreBackend::Memory;
        config
    }

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        assert!(valid_memory_config().validate().is_ok());
    }

    #[test]
    fn test_postgres_backend_requires_url() {
        let mut config = valid_memory_config();
        config.session.store = StoreBackend::Postgres;
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_enabled_notifier_requires_base_url() {
        let mut config = valid_memory_config();
        config.notifier.enabled = true;
        assert!(config.validate().is_err());

        config.notifier.base_url = "http://hooks.local".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.notifier.url(), "http://hooks.local/webhook");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.auth.issuer, "tokenwarden");
        assert_eq!(config.auth.access_ttl_minutes, 1440);
        assert_eq!(config.session.call_timeout_ms, 5_000);
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    }
}
