//! Error types for token lifecycle and merchant operations
//!
//! Messages here are for logs. The presentation layer decides what the
//! client gets to see; for token failures that is deliberately less.

use thiserror::Error;

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature invalid")]
    SignatureInvalid,

    #[error("Malformed token")]
    Malformed,

    #[error("Token expired")]
    Expired,

    /// Unknown, not of the expected kind, or cached with an unexpected fact
    #[error("Token invalid")]
    TokenInvalid,

    #[error("Token revoked")]
    RevokedToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

impl TokenError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::SignatureInvalid => "SIGNATURE_INVALID",
            TokenError::Malformed => "MALFORMED",
            TokenError::Expired => "EXPIRED",
            TokenError::TokenInvalid => "TOKEN_INVALID",
            TokenError::RevokedToken => "REVOKED_TOKEN",
            TokenError::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            TokenError::TokenGenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }

    /// Failures produced by verifying a token's signature and claims
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            TokenError::SignatureInvalid | TokenError::Malformed | TokenError::Expired
        )
    }
}

/// Merchant activation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerchantError {
    #[error("Merchant {code} is not active")]
    Inactive { code: String },

    #[error("Merchant {code} is already active")]
    AlreadyExists { code: String },

    #[error("Merchant {code} is not in the active set")]
    NotRegistered { code: String },

    #[error("No active merchants found")]
    NoActiveMerchants,
}

impl MerchantError {
    pub fn code(&self) -> &'static str {
        match self {
            MerchantError::Inactive { .. } => "MERCHANT_INACTIVE",
            MerchantError::AlreadyExists { .. } => "MERCHANT_ALREADY_EXISTS",
            MerchantError::NotRegistered { .. } => "MERCHANT_NOT_REGISTERED",
            MerchantError::NoActiveMerchants => "NO_ACTIVE_MERCHANTS",
        }
    }
}
