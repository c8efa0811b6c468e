//! Mapping of domain errors to HTTP responses
//!
//! Token failures collapse into one message per operation: an expired
//! token reads the same as a revoked or forged one.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::Value;
use std::fmt;
use tracing::error;

use tg_core::errors::{DomainError, MerchantError};
use tg_shared::ApiResponse;

pub const TOKEN_REJECTED: &str = "token invalid or blacklisted";
pub const REFRESH_REJECTED: &str = "invalid refresh token";
pub const CACHE_RETRY: &str = "temporary cache issue, please retry";
pub const STORE_RETRY: &str = "temporary storage issue, please retry";
pub const INVALID_BODY: &str = "invalid request body";
pub const MERCHANT_INACTIVE: &str = "Invalid or inactive merchant code";
pub const MERCHANT_LOOKUP_FAILED: &str = "Failed to validate merchant code";

/// An error that renders as the standard failure envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(ApiResponse::<Value>::failure(self.message.clone()))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        self.to_response()
    }
}

/// The lifecycle operation an error came out of
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenOperation {
    Generate,
    Validate,
    Logout,
    Refresh,
}

/// Translate a token lifecycle error into the client-facing response
pub fn token_error(operation: TokenOperation, err: &DomainError) -> ApiError {
    if let Some(retry) = retriable(err) {
        return retry;
    }

    match (operation, err) {
        (TokenOperation::Generate, DomainError::Validation { .. }) => {
            ApiError::bad_request(INVALID_BODY)
        }
        (TokenOperation::Generate, _) => ApiError::internal("failed to generate token"),
        (TokenOperation::Validate, DomainError::Token(_)) => ApiError::unauthorized(TOKEN_REJECTED),
        (TokenOperation::Logout, DomainError::Token(_)) => ApiError::unauthorized(TOKEN_REJECTED),
        (TokenOperation::Logout, _) => ApiError::internal("failed to logout token"),
        (TokenOperation::Refresh, DomainError::Token(_)) => {
            ApiError::unauthorized(REFRESH_REJECTED)
        }
        (_, other) => {
            error!(error = %other, code = other.code(), "Unexpected token operation failure");
            ApiError::internal("internal server error")
        }
    }
}

/// Translate a merchant administration error, `fallback` naming the failed action
pub fn merchant_error(err: &DomainError, fallback: &str) -> ApiError {
    if let Some(retry) = retriable(err) {
        return retry;
    }

    match err {
        DomainError::Validation { .. } => ApiError::bad_request("merchant_code is required"),
        DomainError::NotFound { .. } => ApiError::new(StatusCode::NOT_FOUND, "merchant not found"),
        DomainError::Merchant(MerchantError::AlreadyExists { .. }) => {
            ApiError::new(StatusCode::CONFLICT, "merchant code already active")
        }
        DomainError::Merchant(MerchantError::NotRegistered { .. }) => {
            ApiError::new(StatusCode::NOT_FOUND, "merchant code is not active")
        }
        DomainError::Merchant(MerchantError::NoActiveMerchants) => {
            ApiError::new(StatusCode::NOT_FOUND, "no active merchants found")
        }
        _ => ApiError::internal(fallback),
    }
}

fn retriable(err: &DomainError) -> Option<ApiError> {
    match err {
        DomainError::CacheUnavailable { .. } => {
            Some(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, CACHE_RETRY))
        }
        DomainError::StoreUnavailable { .. } => {
            Some(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, STORE_RETRY))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tg_core::errors::TokenError;

    #[test]
    fn test_validation_failures_are_indistinguishable() {
        for kind in [
            TokenError::Expired,
            TokenError::RevokedToken,
            TokenError::SignatureInvalid,
            TokenError::Malformed,
            TokenError::TokenInvalid,
        ] {
            let err = token_error(TokenOperation::Validate, &DomainError::Token(kind));
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.message(), TOKEN_REJECTED);
        }
    }

    #[test]
    fn test_refresh_failures_are_uniform() {
        let err = token_error(
            TokenOperation::Refresh,
            &DomainError::Token(TokenError::InvalidRefreshToken),
        );
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), REFRESH_REJECTED);
    }

    #[test]
    fn test_infrastructure_failures_are_retriable() {
        let err = token_error(TokenOperation::Validate, &DomainError::cache("down"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), CACHE_RETRY);

        let err = token_error(TokenOperation::Refresh, &DomainError::store("down"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.message(), STORE_RETRY);
    }

    #[test]
    fn test_generate_hides_signing_details() {
        let err = token_error(
            TokenOperation::Generate,
            &DomainError::Token(TokenError::TokenGenerationFailed),
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "failed to generate token");
    }

    #[test]
    fn test_merchant_conflicts() {
        let err = merchant_error(
            &MerchantError::AlreadyExists { code: "M1".into() }.into(),
            "Failed to add merchant code",
        );
        assert_eq!(err.status(), StatusCode::CONFLICT);

        let err = merchant_error(
            &DomainError::Internal { message: "boom".into() },
            "Failed to add merchant code",
        );
        assert_eq!(err.message(), "Failed to add merchant code");
    }
}
