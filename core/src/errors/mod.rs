//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

pub use types::{MerchantError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Persistent store unreachable, failed, or missed its deadline
    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    /// Fast cache unreachable, failed, or missed its deadline
    #[error("Cache unavailable: {message}")]
    CacheUnavailable { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Merchant(#[from] MerchantError),
}

impl DomainError {
    pub fn store(message: impl Into<String>) -> Self {
        DomainError::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        DomainError::CacheUnavailable {
            message: message.into(),
        }
    }

    /// Stable machine-readable code, also used as the `outcome` log field
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::NotFound { .. } => "NOT_FOUND",
            DomainError::Internal { .. } => "INTERNAL_ERROR",
            DomainError::StoreUnavailable { .. } => "STORE_UNAVAILABLE",
            DomainError::CacheUnavailable { .. } => "CACHE_UNAVAILABLE",
            DomainError::Token(e) => e.code(),
            DomainError::Merchant(e) => e.code(),
        }
    }

    /// Infrastructure failures the client may retry
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            DomainError::StoreUnavailable { .. } | DomainError::CacheUnavailable { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
