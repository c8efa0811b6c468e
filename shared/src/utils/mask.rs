//! Helpers for keeping bearer tokens out of logs

use sha2::{Digest, Sha256};

/// Number of characters kept visible at each end
const VISIBLE_CHARS: usize = 6;

/// Mask a token for logging, keeping the first and last 6 characters
///
/// # Examples
/// ```
/// use tg_shared::mask_token;
///
/// assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload.signature"), "eyJhbG....nature");
/// assert_eq!(mask_token("short"), "********");
/// ```
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    // at least one character must stay hidden
    if chars.len() <= 2 * VISIBLE_CHARS {
        return "********".to_string();
    }
    let head: String = chars[..VISIBLE_CHARS].iter().collect();
    let tail: String = chars[chars.len() - VISIBLE_CHARS..].iter().collect();
    format!("{}....{}", head, tail)
}

/// Stable short identifier for a token (first 8 bytes of its SHA-256, hex)
///
/// Lets log lines about the same token be correlated without exposing it.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}
