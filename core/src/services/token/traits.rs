//! Cache interface used by the token lifecycle

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::DomainError;

/// Value stored under a raw access token while it is known to be issued
pub const VALID_FACT: &str = "valid";

/// Value stored under [`blacklist_key`] once a token is revoked
pub const BLACKLIST_FACT: &str = "true";

const BLACKLIST_PREFIX: &str = "blacklist:";

/// Cache key of the revocation fact for `token`
pub fn blacklist_key(token: &str) -> String {
    format!("{}{}", BLACKLIST_PREFIX, token)
}

/// Fast, lossy key/value cache in front of the token store
///
/// Nothing here is transactional and any entry may vanish at any time.
/// `Err` means the cache could not answer, which is distinct from a miss.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Store `value` under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;
    /// Fetch `key`; `Ok(None)` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;
    /// Remove `key`; succeeds when it is already absent
    async fn delete(&self, key: &str) -> Result<(), DomainError>;
    async fn exists(&self, key: &str) -> Result<bool, DomainError>;
}
