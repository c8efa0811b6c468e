//! Common utility functions

pub mod mask;
pub mod time;

// Re-export commonly used utilities
pub use mask::{mask_token, token_fingerprint};
pub use time::format_timestamp;
