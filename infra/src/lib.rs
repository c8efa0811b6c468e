//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the TokenGate server,
//! following Clean Architecture principles. It provides the concrete
//! implementations behind the traits declared in `tg_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Database**: PostgreSQL token store and merchant table reader using SQLx
//! - **Cache**: Redis client backing the token facts and the active-merchant set

/// Database module - PostgreSQL implementations using SQLx
pub mod database;

/// Cache module - Redis client and operations
pub mod cache;

/// Configuration types consumed by this crate
pub mod config {
    pub use tg_shared::config::{CacheConfig, DatabaseConfig};
}

pub use cache::{RedisClient, RedisMerchantCache, RedisTokenCache};
pub use database::{DatabasePool, PgMerchantRepository, PgTokenRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failure at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
