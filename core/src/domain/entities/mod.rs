//! Domain entities representing core business objects.

pub mod merchant;
pub mod token;


// Re-export commonly used types
pub use merchant::Merchant;
pub use token::{
    Claims, IssuedTokens, TokenRecord, TokenType, ACCESS_TOKEN_EXPIRY_MINUTES,
    BLACKLIST_MIN_TTL_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS,
};
