//! Token repository module.

mod r#trait;
pub use r#trait::{TokenRepository, TokenTransaction};

#[cfg(any(test, feature = "test-utils"))]
mod mock;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockTokenRepository, MockTokenTransaction};

#[cfg(test)]
mod tests;
