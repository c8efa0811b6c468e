//! Merchant repository module.

mod r#trait;
pub use r#trait::MerchantRepository;

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockMerchantRepository;
