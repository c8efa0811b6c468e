//! Merchant (tenant) activation: the active-code set and the gate built on it

mod service;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
mod mock;


pub use service::MerchantService;
pub use traits::{MerchantCache, TenantGate};

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockMerchantCache;
