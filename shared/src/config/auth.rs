//! Token signing configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT signing and lifetime configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HMAC-SHA256 signing
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// Minimum lifetime of a blacklist entry in seconds
    #[serde(default = "default_blacklist_min_ttl")]
    pub blacklist_min_ttl: i64,

    /// Upper bound for a single store or cache call in milliseconds
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            blacklist_min_ttl: default_blacklist_min_ttl(),
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_or("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            blacklist_min_ttl: env_or("JWT_BLACKLIST_MIN_TTL", defaults.blacklist_min_ttl),
            operation_timeout_ms: env_or("TOKEN_OPERATION_TIMEOUT_MS", defaults.operation_timeout_ms),
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_blacklist_min_ttl() -> i64 {
    900
}

fn default_operation_timeout_ms() -> u64 {
    2000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.blacklist_min_ttl, 900);
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.secret, "my-secret");
        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secret());
    }
}
