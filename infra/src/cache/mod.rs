//! Cache module for Redis-based caching
//!
//! This module provides the Redis client with retry logic and the two
//! cache adapters the core consumes: token facts and the merchant set.

pub mod merchant_cache;
pub mod redis_client;
pub mod token_cache;


pub use merchant_cache::RedisMerchantCache;
pub use redis_client::RedisClient;
pub use token_cache::RedisTokenCache;

// Re-export commonly used types
pub use tg_shared::config::cache::CacheConfig;
