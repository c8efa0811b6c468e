pub mod merchant;
pub mod token;

pub use merchant::MerchantRepository;
pub use token::{TokenRepository, TokenTransaction};

#[cfg(any(test, feature = "test-utils"))]
pub use merchant::MockMerchantRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use token::{MockTokenRepository, MockTokenTransaction};
