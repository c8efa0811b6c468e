//! HMAC-SHA256 signed token codec

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenType};
use crate::errors::TokenError;

/// Signs and verifies tokens with a shared secret
///
/// The secret is process configuration and never appears in a token.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a new token for `subject_id`
    pub fn issue(
        &self,
        subject_id: &str,
        token_type: TokenType,
        expires_at: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims::new(subject_id, token_type, expires_at);
        self.encode(&claims)
    }

    pub(crate) fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| TokenError::TokenGenerationFailed)
    }

    /// Verify signature and expiry and return the decoded claims
    ///
    /// # Errors
    /// * `SignatureInvalid` - MAC does not match the configured secret
    /// * `Expired` - `exp` is at or before the current time
    /// * `Malformed` - anything else, including a non-HS256 header
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        // the library accepts exp == now
        if data.claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
