//! # TokenGate Core
//!
//! Core business logic and domain layer for the TokenGate backend.
//! This crate contains domain entities, the token lifecycle and merchant
//! services, repository and cache interfaces, and error types that form
//! the foundation of the application architecture.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Claims, IssuedTokens, Merchant, TokenRecord, TokenType};
pub use errors::{DomainError, MerchantError, TokenError};
pub use repositories::{MerchantRepository, TokenRepository, TokenTransaction};
pub use services::{
    MerchantCache, MerchantService, TenantGate, TokenCache, TokenCodec, TokenService,
    TokenServiceConfig,
};

#[cfg(test)]
mod tests {
    use super::{DomainError, TokenError, TokenType};

    #[test]
    fn test_root_exports_name_the_domain_types() {
        let token_type: TokenType = "refresh".parse().unwrap();
        assert_eq!(token_type, crate::domain::entities::token::TokenType::Refresh);

        let err: DomainError = TokenError::RevokedToken.into();
        assert!(matches!(err, crate::errors::DomainError::Token(TokenError::RevokedToken)));
    }
}
