//! Unit tests for domain error types

use crate::errors::{DomainError, MerchantError, TokenError};

#[test]
fn test_token_error_bridges_into_domain_error() {
    let error: DomainError = TokenError::RevokedToken.into();
    assert_eq!(error, DomainError::Token(TokenError::RevokedToken));
    assert_eq!(error.code(), "REVOKED_TOKEN");
    assert_eq!(error.to_string(), "Token revoked");
}

#[test]
fn test_merchant_error_codes() {
    let error: DomainError = MerchantError::Inactive {
        code: "MRC9".to_string(),
    }
    .into();
    assert_eq!(error.code(), "MERCHANT_INACTIVE");
    assert!(error.to_string().contains("MRC9"));
    assert_eq!(MerchantError::NoActiveMerchants.code(), "NO_ACTIVE_MERCHANTS");
}

#[test]
fn test_only_infrastructure_errors_are_retriable() {
    assert!(DomainError::cache("timeout").is_retriable());
    assert!(DomainError::store("pool closed").is_retriable());
    assert!(!DomainError::from(TokenError::TokenInvalid).is_retriable());
    assert!(!DomainError::Internal {
        message: "x".to_string()
    }
    .is_retriable());
}

#[test]
fn test_verification_failures() {
    assert!(TokenError::SignatureInvalid.is_verification_failure());
    assert!(TokenError::Expired.is_verification_failure());
    assert!(!TokenError::RevokedToken.is_verification_failure());
    assert!(!TokenError::InvalidRefreshToken.is_verification_failure());
}
