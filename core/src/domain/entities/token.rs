//! Token entities for bearer authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Access token expiration time (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Refresh token expiration time (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Lower bound for how long a blacklist entry is retained (15 minutes)
pub const BLACKLIST_MIN_TTL_MINUTES: i64 = 15;

/// Kind of a signed token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential presented on each request
    Access,
    /// Long-lived credential used only to rotate the pair
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access" => Ok(TokenType::Access),
            "refresh" => Ok(TokenType::Refresh),
            other => Err(format!("unknown token type: {}", other)),
        }
    }
}

/// Claims structure for the signed token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (merchant / user identifier)
    pub sub: String,

    /// Token kind
    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// Expiration timestamp (Unix seconds)
    pub exp: i64,

    /// Issued at timestamp (Unix seconds)
    pub iat: i64,

    /// Unique token id; keeps two tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims for `subject_id` expiring at `expires_at`
    pub fn new(subject_id: impl Into<String>, token_type: TokenType, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: subject_id.into(),
            token_type,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Expiry as a timestamp, `None` if `exp` is out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Persisted record of an issued token pair
///
/// Revocation is expressed by deleting the row together with a blacklist
/// entry in the cache; `is_revoked` is written but never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Surrogate key assigned by the store (0 until persisted)
    pub id: i64,

    /// Merchant / user the tokens were issued to
    pub subject_id: String,

    /// Signed access token
    pub access_token: String,

    /// Signed refresh token, present when a full pair was issued
    pub refresh_token: Option<String>,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Access token expiry
    pub expires_at: DateTime<Utc>,

    /// Best-effort revocation flag
    pub is_revoked: bool,
}

impl TokenRecord {
    /// Creates a new, not yet persisted record
    pub fn new(
        subject_id: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: 0,
            subject_id: subject_id.into(),
            access_token: access_token.into(),
            refresh_token,
            created_at,
            expires_at,
            is_revoked: false,
        }
    }

    /// Checks if the access token has passed its expiry
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time left until the access token expires, `None` once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let remaining = self.expires_at - now;
        if remaining > Duration::zero() {
            Some(remaining)
        } else {
            None
        }
    }
}

/// Result of a successful issuance or rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedTokens {
    pub subject_id: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub issued_at: DateTime<Utc>,
    /// Access token expiry
    pub expires_at: DateTime<Utc>,
    pub refresh_expires_at: Option<DateTime<Utc>>,
}

impl IssuedTokens {
    pub fn from_record(record: &TokenRecord, refresh_expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            subject_id: record.subject_id.clone(),
            access_token: record.access_token.clone(),
            refresh_token: record.refresh_token.clone(),
            issued_at: record.created_at,
            expires_at: record.expires_at,
            refresh_expires_at,
        }
    }

    /// Seconds until the access token expires, measured from issuance
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - self.issued_at).num_seconds()
    }
}
