//! In-memory TokenCache for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use crate::errors::DomainError;

use super::traits::TokenCache;

/// Which calls a [`MockTokenCache`] should fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheFailure {
    #[default]
    None,
    /// Every call fails, as if the cache were down
    All,
    /// Reads succeed, `set` and `delete` fail
    Writes,
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
    ttl: Duration,
}

/// Mock cache with per-key expiry driven by tokio's clock
///
/// Clones share state.
#[derive(Clone, Default)]
pub struct MockTokenCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    failure: Arc<Mutex<CacheFailure>>,
}

impl MockTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, failure: CacheFailure) {
        if let Ok(mut guard) = self.failure.lock() {
            *guard = failure;
        }
    }

    /// TTL the key was last written with, if it is still live
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.live(key).map(|entry| entry.ttl)
    }

    /// Current value of the key, bypassing failure injection
    pub fn peek(&self, key: &str) -> Option<String> {
        self.live(key).map(|entry| entry.value)
    }

    /// Write directly, bypassing failure injection
    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: value.to_string(),
                    expires_at: Instant::now() + ttl,
                    ttl,
                },
            );
        }
    }

    fn live(&self, key: &str) -> Option<Entry> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .cloned()
    }

    fn check(&self, write: bool) -> Result<(), DomainError> {
        let failure = self.failure.lock().map(|f| *f).unwrap_or_default();
        match failure {
            CacheFailure::All => Err(DomainError::cache("mock cache unavailable")),
            CacheFailure::Writes if write => Err(DomainError::cache("mock cache rejected write")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TokenCache for MockTokenCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.check(true)?;
        self.insert(key, value, ttl);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.check(false)?;
        Ok(self.live(key).map(|entry| entry.value))
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.check(true)?;
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        self.check(false)?;
        Ok(self.live(key).is_some())
    }
}
