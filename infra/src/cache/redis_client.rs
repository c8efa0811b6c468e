//! Redis cache client implementation
//!
//! This module provides a Redis client with retry logic and the string and
//! set operations used by the token cache and the active-merchant set.
//! Keys passed in here are frequently raw bearer tokens, so they are only
//! ever logged masked.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use tg_shared::mask_token;

use crate::config::CacheConfig;
use crate::InfrastructureError;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with a multiplexed connection and retry logic
///
/// Cloning is cheap; all clones share the same connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Create a new Redis client
    ///
    /// # Example
    /// ```no_run
    /// use tg_infra::cache::{CacheConfig, RedisClient};
    ///
    /// async fn create_client() -> Result<RedisClient, Box<dyn std::error::Error>> {
    ///     let client = RedisClient::new(CacheConfig::new("redis://localhost:6379")).await?;
    ///     Ok(client)
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let max_retries = config.max_retries.max(1);
        let connection = Self::create_connection_with_retry(
            client,
            max_retries,
            config.retry_delay_ms,
            Duration::from_secs(config.connection_timeout),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
        connect_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            let result =
                tokio::time::timeout(connect_timeout, client.get_multiplexed_async_connection())
                    .await
                    .unwrap_or_else(|_| {
                        Err(RedisError::from((
                            redis::ErrorKind::IoError,
                            "connection timed out",
                        )))
                    });

            match result {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a value with expiration time
    ///
    /// Redis expiries are whole seconds; anything shorter is rounded up to 1.
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry: Duration,
    ) -> Result<(), InfrastructureError> {
        let seconds = expiry.as_secs().max(1);
        debug!(key = %mask_token(key), ttl_secs = seconds, "Setting key");

        let key_owned = key.to_string();
        let value = value.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, seconds).await })
        })
        .await
        .map_err(|e| {
            error!(key = %mask_token(key), "Failed to set key: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value from cache; `None` if absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let key_owned = key.to_string();
        let value = self
            .execute_with_retry(move |mut conn| {
                let key = key_owned.clone();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await
            .map_err(|e| {
                error!(key = %mask_token(key), "Failed to get key: {}", e);
                InfrastructureError::Cache(e)
            })?;

        debug!(key = %mask_token(key), hit = value.is_some(), "Got key");
        Ok(value)
    }

    /// Delete a key; true if something was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key_owned = key.to_string();
        let deleted = self
            .execute_with_retry(move |mut conn| {
                let key = key_owned.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await
            .map_err(|e| {
                error!(key = %mask_token(key), "Failed to delete key: {}", e);
                InfrastructureError::Cache(e)
            })?;

        Ok(deleted > 0)
    }

    /// Check if a key exists in cache
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let key_owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
        .map_err(|e| {
            error!(key = %mask_token(key), "Failed to check key existence: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Add a member to a set; true if it was not already present
    pub async fn set_add(&self, set: &str, member: &str) -> Result<bool, InfrastructureError> {
        let (set_owned, member) = (set.to_string(), member.to_string());
        let added = self
            .execute_with_retry(move |mut conn| {
                let (set, member) = (set_owned.clone(), member.clone());
                Box::pin(async move { conn.sadd::<_, _, u32>(set, member).await })
            })
            .await
            .map_err(|e| {
                error!(set, "Failed to add set member: {}", e);
                InfrastructureError::Cache(e)
            })?;
        Ok(added > 0)
    }

    /// Remove a member from a set; true if it was present
    pub async fn set_remove(&self, set: &str, member: &str) -> Result<bool, InfrastructureError> {
        let (set_owned, member) = (set.to_string(), member.to_string());
        let removed = self
            .execute_with_retry(move |mut conn| {
                let (set, member) = (set_owned.clone(), member.clone());
                Box::pin(async move { conn.srem::<_, _, u32>(set, member).await })
            })
            .await
            .map_err(|e| {
                error!(set, "Failed to remove set member: {}", e);
                InfrastructureError::Cache(e)
            })?;
        Ok(removed > 0)
    }

    pub async fn set_contains(&self, set: &str, member: &str) -> Result<bool, InfrastructureError> {
        let (set_owned, member) = (set.to_string(), member.to_string());
        self.execute_with_retry(move |mut conn| {
            let (set, member) = (set_owned.clone(), member.clone());
            Box::pin(async move { conn.sismember::<_, _, bool>(set, member).await })
        })
        .await
        .map_err(|e| {
            error!(set, "Failed to check set membership: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    pub async fn set_members(&self, set: &str) -> Result<Vec<String>, InfrastructureError> {
        let set_owned = set.to_string();
        self.execute_with_retry(move |mut conn| {
            let set = set_owned.clone();
            Box::pin(async move { conn.smembers::<_, Vec<String>>(set).await })
        })
        .await
        .map_err(|e| {
            error!(set, "Failed to read set members: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Replace the contents of a set in one MULTI/EXEC block
    pub async fn set_replace(&self, set: &str, members: &[String]) -> Result<(), InfrastructureError> {
        let (set_owned, members) = (set.to_string(), members.to_vec());
        self.execute_with_retry(move |mut conn| {
            let (set, members) = (set_owned.clone(), members.clone());
            Box::pin(async move {
                let mut pipe = redis::pipe();
                pipe.atomic().del(&set).ignore();
                if !members.is_empty() {
                    pipe.sadd(&set, members).ignore();
                }
                pipe.query_async::<_, ()>(&mut conn).await
            })
        })
        .await
        .map_err(|e| {
            error!(set, "Failed to replace set: {}", e);
            InfrastructureError::Cache(e)
        })
    }

    /// Execute a Redis operation with automatic retry logic
    ///
    /// Retries transient failures with exponential backoff.
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            let conn = self.connection.clone();

            match operation(conn).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    // Exponential backoff with cap at 5 seconds
                    delay = (delay * 2).min(5000);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Check if a Redis error is transient and the operation should be retried
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(proto_end) = url.find("://") {
            let proto = &url[..proto_end + 3];
            let host_part = &url[at_pos..];
            return format!("{}****{}", proto, host_part);
        }
    }
    url.to_string()
}
