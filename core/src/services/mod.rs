//! Business services containing domain logic and use cases.

pub mod merchant;
pub mod token;

// Re-export commonly used types
pub use merchant::{MerchantCache, MerchantService, TenantGate};
pub use token::{
    blacklist_key, blacklist_ttl, TokenCache, TokenCodec, TokenService, TokenServiceConfig,
    BLACKLIST_FACT, VALID_FACT,
};

#[cfg(any(test, feature = "test-utils"))]
pub use merchant::MockMerchantCache;
#[cfg(any(test, feature = "test-utils"))]
pub use token::{CacheFailure, MockTokenCache};
