//! Redis-backed token fact cache

use async_trait::async_trait;
use std::time::Duration;

use tg_core::errors::DomainError;
use tg_core::services::TokenCache;

use super::redis_client::RedisClient;
use crate::InfrastructureError;

/// [`TokenCache`] over plain Redis string keys
///
/// Raw access tokens map to `"valid"`, `blacklist:<token>` maps to `"true"`.
#[derive(Clone)]
pub struct RedisTokenCache {
    client: RedisClient,
}

impl RedisTokenCache {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

pub(crate) fn cache_error(e: InfrastructureError) -> DomainError {
    DomainError::cache(e.to_string())
}

#[async_trait]
impl TokenCache for RedisTokenCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        self.client
            .set_with_expiry(key, value, ttl)
            .await
            .map_err(cache_error)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.client.get(key).await.map_err(cache_error)
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        self.client.delete(key).await.map(|_| ()).map_err(cache_error)
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        self.client.exists(key).await.map_err(cache_error)
    }
}
