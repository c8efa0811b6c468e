//! Redis set of active merchant codes

use async_trait::async_trait;

use tg_core::errors::DomainError;
use tg_core::services::MerchantCache;

use super::redis_client::RedisClient;
use super::token_cache::cache_error;

/// [`MerchantCache`] stored as a single Redis set
#[derive(Clone)]
pub struct RedisMerchantCache {
    client: RedisClient,
    set_key: String,
}

impl RedisMerchantCache {
    pub fn new(client: RedisClient, set_key: impl Into<String>) -> Self {
        Self {
            client,
            set_key: set_key.into(),
        }
    }
}

#[async_trait]
impl MerchantCache for RedisMerchantCache {
    async fn replace_all(&self, codes: &[String]) -> Result<(), DomainError> {
        self.client
            .set_replace(&self.set_key, codes)
            .await
            .map_err(cache_error)
    }

    async fn contains(&self, code: &str) -> Result<bool, DomainError> {
        self.client
            .set_contains(&self.set_key, code)
            .await
            .map_err(cache_error)
    }

    async fn add(&self, code: &str) -> Result<bool, DomainError> {
        self.client
            .set_add(&self.set_key, code)
            .await
            .map_err(cache_error)
    }

    async fn remove(&self, code: &str) -> Result<bool, DomainError> {
        self.client
            .set_remove(&self.set_key, code)
            .await
            .map_err(cache_error)
    }

    async fn members(&self) -> Result<Vec<String>, DomainError> {
        let mut codes = self
            .client
            .set_members(&self.set_key)
            .await
            .map_err(cache_error)?;
        codes.sort();
        Ok(codes)
    }
}

