//! Token service module
//!
//! This module handles the bearer token lifecycle:
//! - HS256 token signing and verification
//! - Issuance backed by the token store with a cached `valid` hint
//! - Validation through blacklist, cache and store, then the codec
//! - Revocation via blacklist facts and rotation of refresh tokens

mod codec;
mod config;
mod service;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::TokenServiceConfig;
pub use service::{blacklist_ttl, TokenService};
pub use traits::{blacklist_key, TokenCache, BLACKLIST_FACT, VALID_FACT};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{CacheFailure, MockTokenCache};
