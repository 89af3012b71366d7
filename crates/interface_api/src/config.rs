//! API configuration
//!
//! Loaded from environment variables prefixed with `API_`. Nested sections
//! use a double underscore, so `API_DATABASE__URL` sets `database.url` and
//! `API_LIFECYCLE__RENEWAL_WINDOW_DAYS` sets `lifecycle.renewal_window_days`.

use serde::Deserialize;

use app_lifecycle::LifecycleConfig;
use infra_db::DatabaseConfig;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// API configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// JWT secret for authentication; must be set
    pub jwt_secret: String,
    /// JWT expiration in seconds
    pub jwt_expiration_secs: u64,
    /// Log level, overridden by `RUST_LOG`
    pub log_level: String,
    pub log_format: LogFormat,
    pub database: DatabaseConfig,
    pub lifecycle: LifecycleConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: String::new(),
            jwt_expiration_secs: 3600,
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            database: DatabaseConfig::default(),
            lifecycle: LifecycleConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("API")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot start with
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message("jwt_secret must be set".to_string()));
        }
        if self.jwt_expiration_secs == 0 {
            return Err(config::ConfigError::Message(
                "jwt_expiration_secs must be positive".to_string(),
            ));
        }
        self.lifecycle
            .validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
