use serde::{Deserialize, Serialize};
use validator::Validate;

use tg_core::domain::entities::token::{Claims, IssuedTokens, TokenType};
use tg_shared::format_timestamp;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GenerateTokenRequest {
    /// Merchant code the token is issued to; must be in the active set
    #[validate(length(min = 1, max = 64))]
    pub user_id: String,

    /// `access` for an access token only, `refresh` for a full pair
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub user_id: String,
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub created_at: String,
    pub expires_at: String,
}

impl TokenResponse {
    /// Render issued tokens with timestamps in the given UTC offset
    pub fn from_issued(issued: IssuedTokens, offset_hours: i32) -> Self {
        Self {
            expires_in: issued.expires_in(),
            created_at: format_timestamp(issued.issued_at, offset_hours),
            expires_at: format_timestamp(issued.expires_at, offset_hours),
            user_id: issued.subject_id,
            access_token: issued.access_token,
            refresh_token: issued.refresh_token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
    pub claims: Claims,
}
