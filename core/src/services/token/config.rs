//! Configuration for the token service

use std::time::Duration;

use chrono::Duration as ChronoDuration;
use tg_shared::JwtConfig;

use crate::domain::entities::token::{
    TokenType, ACCESS_TOKEN_EXPIRY_MINUTES, BLACKLIST_MIN_TTL_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS,
};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_expiry_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_expiry_secs: i64,
    /// Minimum blacklist retention in seconds
    pub blacklist_min_ttl_secs: i64,
    /// Deadline for each individual store or cache call
    pub operation_timeout_ms: u64,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            access_token_expiry_secs: ACCESS_TOKEN_EXPIRY_MINUTES * 60,
            refresh_token_expiry_secs: REFRESH_TOKEN_EXPIRY_DAYS * 86400,
            blacklist_min_ttl_secs: BLACKLIST_MIN_TTL_MINUTES * 60,
            operation_timeout_ms: 2000,
        }
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            jwt_secret: config.secret.clone(),
            access_token_expiry_secs: config.access_token_expiry,
            refresh_token_expiry_secs: config.refresh_token_expiry,
            blacklist_min_ttl_secs: config.blacklist_min_ttl,
            operation_timeout_ms: config.operation_timeout_ms,
        }
    }
}

impl TokenServiceConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    /// Lifetime of a freshly minted token of the given type
    pub fn lifetime(&self, token_type: TokenType) -> ChronoDuration {
        match token_type {
            TokenType::Access => ChronoDuration::seconds(self.access_token_expiry_secs),
            TokenType::Refresh => ChronoDuration::seconds(self.refresh_token_expiry_secs),
        }
    }

    pub fn blacklist_floor(&self) -> ChronoDuration {
        ChronoDuration::seconds(self.blacklist_min_ttl_secs)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }
}
