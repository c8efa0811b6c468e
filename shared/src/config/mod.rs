//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing and lifetime configuration
//! - `cache` - Redis configuration
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Errors raised while validating the loaded configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("JWT_SECRET is not set in environment")]
    MissingJwtSecret,

    #[error("JWT_SECRET must be changed from the development default in {0}")]
    DefaultJwtSecret(Environment),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Token signing configuration
    pub jwt: JwtConfig,

    /// Cache configuration
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject configurations the service must not start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        if self.environment.is_production() && self.jwt.is_using_default_secret() {
            return Err(ConfigError::DefaultJwtSecret(self.environment));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "JWT_ACCESS_TOKEN_EXPIRY".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.jwt.refresh_token_expiry <= self.jwt.access_token_expiry {
            return Err(ConfigError::InvalidValue {
                field: "JWT_REFRESH_TOKEN_EXPIRY".to_string(),
                message: "must be longer than the access token expiry".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(AppConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let mut config = AppConfig::default();
        config.jwt.secret = "  ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::MissingJwtSecret));
    }

    #[test]
    fn test_default_secret_rejected_in_production() {
        let mut config = AppConfig::default();
        config.environment = Environment::Production;
        assert_eq!(
            config.validate(),
            Err(ConfigError::DefaultJwtSecret(Environment::Production))
        );

        config.jwt.secret = "a-real-production-secret".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_refresh_must_outlive_access() {
        let mut config = AppConfig::default();
        config.jwt.refresh_token_expiry = config.jwt.access_token_expiry;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
