//! Shared utilities and common types for the TokenGate server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The JSON response envelope returned by every endpoint
//! - Token masking and timestamp formatting helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ServerConfig,
};
pub use types::{ApiResponse, HealthResponse};
pub use utils::{format_timestamp, mask_token, token_fingerprint};
