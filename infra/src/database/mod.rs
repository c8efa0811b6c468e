//! Database module - PostgreSQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management and embedded migrations
//! - The token store with transaction support
//! - The read-only merchant registry

pub mod connection;
pub mod postgres;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use postgres::{PgMerchantRepository, PgTokenRepository, PgTokenTransaction};
