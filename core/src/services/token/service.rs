//! Token lifecycle service: issue, validate, blacklist and refresh

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tracing::{debug, error, info, warn};

use tg_shared::{mask_token, token_fingerprint};

use crate::domain::entities::token::{Claims, IssuedTokens, TokenRecord, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{TokenRepository, TokenTransaction};

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;
use super::traits::{blacklist_key, TokenCache, BLACKLIST_FACT, VALID_FACT};

/// Retention for a blacklist fact
///
/// Never shorter than `floor`, and never shorter than what is left of the
/// token's own lifetime.
pub fn blacklist_ttl(
    floor: ChronoDuration,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ChronoDuration {
    match expires_at {
        Some(expires_at) => std::cmp::max(floor, expires_at - now),
        None => floor,
    }
}

/// Service for issuing, validating, revoking and rotating bearer tokens
///
/// The store is the authority for which tokens exist; the cache holds
/// `valid` hints that can be lost at will and blacklist facts that cannot
/// be ignored.
pub struct TokenService<R: TokenRepository, C: TokenCache + 'static> {
    pub(crate) repository: R,
    cache: Arc<C>,
    codec: TokenCodec,
    config: TokenServiceConfig,
}

impl<R: TokenRepository, C: TokenCache + 'static> TokenService<R, C> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Token store
    /// * `cache` - Fast cache shared with background repair tasks
    /// * `config` - Token service configuration
    pub fn new(repository: R, cache: Arc<C>, config: TokenServiceConfig) -> Self {
        let codec = TokenCodec::new(&config.jwt_secret);
        Self {
            repository,
            cache,
            codec,
            config,
        }
    }

    /// Issues a token for `subject_id` and records it in the store
    ///
    /// `TokenType::Access` mints an access token only; `TokenType::Refresh`
    /// mints an access token together with a refresh token.
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedTokens)` - The minted token(s) and their expiry
    /// * `Err(DomainError)` - Validation, signing or store failure
    pub async fn issue(
        &self,
        subject_id: &str,
        token_type: TokenType,
    ) -> Result<IssuedTokens, DomainError> {
        let started = Instant::now();
        let result = self.issue_inner(subject_id, token_type).await;
        log_outcome("issue", Target::Subject(subject_id), &result, started);
        result
    }

    async fn issue_inner(
        &self,
        subject_id: &str,
        token_type: TokenType,
    ) -> Result<IssuedTokens, DomainError> {
        if subject_id.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "subject id is required".to_string(),
            });
        }

        let (record, refresh_expires_at) =
            self.mint(subject_id, token_type == TokenType::Refresh)?;

        let mut tx = self.store(self.repository.begin()).await?;
        let saved = match self.store(tx.save(record)).await {
            Ok(saved) => saved,
            Err(e) => {
                self.abandon(tx).await;
                return Err(e);
            }
        };
        self.store(tx.commit()).await?;

        self.remember_valid(&saved.access_token, saved.expires_at).await;

        Ok(IssuedTokens::from_record(&saved, refresh_expires_at))
    }

    /// Validates an access token and returns its claims
    ///
    /// Blacklist facts are consulted first and always win. A missing
    /// `valid` hint falls back to the store, and whichever layer answered,
    /// the signature and expiry must verify as well.
    ///
    /// # Errors
    ///
    /// * `RevokedToken` - A blacklist fact exists for the token
    /// * `TokenInvalid` - Unknown to cache and store, or not an access token
    /// * `SignatureInvalid` / `Expired` / `Malformed` - Codec rejected it
    /// * `CacheUnavailable` - The blacklist or validity check could not run
    pub async fn validate(&self, token: &str) -> Result<Claims, DomainError> {
        let started = Instant::now();
        let result = self.validate_inner(token).await;
        log_outcome("validate", Target::Token(token), &result, started);
        result
    }

    async fn validate_inner(&self, token: &str) -> Result<Claims, DomainError> {
        if token.is_empty() {
            return Err(TokenError::TokenInvalid.into());
        }

        if self.cached(self.cache.exists(&blacklist_key(token))).await? {
            return Err(TokenError::RevokedToken.into());
        }

        match self.cached(self.cache.get(token)).await? {
            Some(fact) if fact == VALID_FACT => {}
            Some(_) => return Err(TokenError::TokenInvalid.into()),
            None => {
                let record = self
                    .store(self.repository.find_by_access_token(token))
                    .await?
                    .ok_or(TokenError::TokenInvalid)?;
                self.repair_valid_fact(record);
            }
        }

        let claims = self.codec.verify(token)?;
        if claims.token_type != TokenType::Access {
            return Err(TokenError::TokenInvalid.into());
        }

        Ok(claims)
    }

    /// Revokes an access token
    ///
    /// Safe to call repeatedly and for tokens the store no longer knows;
    /// the blacklist fact is written in every case.
    ///
    /// # Errors
    ///
    /// * `StoreUnavailable` - The record lookup or delete failed; the
    ///   blacklist fact is written regardless
    /// * `CacheUnavailable` - The blacklist fact could not be written
    pub async fn blacklist(&self, token: &str) -> Result<(), DomainError> {
        let started = Instant::now();
        let result = self.blacklist_inner(token).await;
        log_outcome("blacklist", Target::Token(token), &result, started);
        result
    }

    async fn blacklist_inner(&self, token: &str) -> Result<(), DomainError> {
        if token.is_empty() {
            return Err(TokenError::TokenInvalid.into());
        }

        if let Err(e) = self.cached(self.cache.delete(token)).await {
            warn!(token = %mask_token(token), error = %e, "Failed to drop valid fact");
        }

        let record = match self.store(self.repository.find_by_access_token(token)).await {
            Ok(record) => record,
            Err(e) => return Err(self.revoke_unconfirmed(token, e).await),
        };

        if let Some(ref record) = record {
            if let Err(e) = self.delete_record(record).await {
                return Err(self.revoke_unconfirmed(token, e).await);
            }
        } else {
            debug!(token = %mask_token(token), "Blacklisting token unknown to the store");
        }

        let ttl = blacklist_ttl(
            self.config.blacklist_floor(),
            record.map(|r| r.expires_at),
            Utc::now(),
        );
        self.cached(
            self.cache
                .set(&blacklist_key(token), BLACKLIST_FACT, to_std(ttl)),
        )
        .await
    }

    async fn delete_record(&self, record: &TokenRecord) -> Result<(), DomainError> {
        let mut tx = self.store(self.repository.begin()).await?;
        if let Err(e) = self
            .store(tx.delete_by_access_token(&record.access_token))
            .await
        {
            self.abandon(tx).await;
            return Err(e);
        }
        self.store(tx.commit()).await
    }

    /// Records the revocation when the store could not take part in it
    ///
    /// Retention comes from the token's own `exp` claim since there is no
    /// record to read it from. The store error is handed back to the caller.
    async fn revoke_unconfirmed(&self, token: &str, store_error: DomainError) -> DomainError {
        let claimed_expiry = self.codec.verify(token).ok().and_then(|c| c.expires_at());
        let ttl = blacklist_ttl(self.config.blacklist_floor(), claimed_expiry, Utc::now());

        if let Err(e) = self
            .cached(self.cache.set(&blacklist_key(token), BLACKLIST_FACT, to_std(ttl)))
            .await
        {
            error!(token = %mask_token(token), error = %e, "Failed to blacklist token during store outage");
        }
        store_error
    }

    /// Rotates a refresh token into a brand-new pair
    ///
    /// The old record is removed in the same transaction that stores the
    /// new one, so each refresh token can be exchanged at most once. The
    /// access token it was issued with is retired afterwards.
    ///
    /// # Errors
    ///
    /// * `InvalidRefreshToken` - Unknown, already used, or fails verification
    /// * `StoreUnavailable` - The store could not complete the rotation
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, DomainError> {
        let started = Instant::now();
        let result = self.refresh_inner(refresh_token).await;
        log_outcome("refresh", Target::Token(refresh_token), &result, started);
        result
    }

    async fn refresh_inner(&self, refresh_token: &str) -> Result<IssuedTokens, DomainError> {
        if refresh_token.is_empty() {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let old = self
            .store(self.repository.find_by_refresh_token(refresh_token))
            .await?
            .ok_or(TokenError::InvalidRefreshToken)?;

        let claims = self
            .codec
            .verify(refresh_token)
            .map_err(|_| TokenError::InvalidRefreshToken)?;
        if claims.token_type != TokenType::Refresh || claims.sub != old.subject_id {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        let (record, refresh_expires_at) = self.mint(&old.subject_id, true)?;

        let mut tx = self.store(self.repository.begin()).await?;
        let consumed = match self
            .store(tx.delete_by_refresh_token(refresh_token))
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                self.abandon(tx).await;
                return Err(e);
            }
        };
        if consumed == 0 {
            self.abandon(tx).await;
            return Err(TokenError::InvalidRefreshToken.into());
        }
        let saved = match self.store(tx.save(record)).await {
            Ok(saved) => saved,
            Err(e) => {
                self.abandon(tx).await;
                return Err(e);
            }
        };
        self.store(tx.commit()).await?;

        self.retire_access_token(&old).await;
        self.remember_valid(&saved.access_token, saved.expires_at).await;

        Ok(IssuedTokens::from_record(&saved, refresh_expires_at))
    }

    /// Signs a new access token, and a refresh token when `with_refresh` is set
    fn mint(
        &self,
        subject_id: &str,
        with_refresh: bool,
    ) -> Result<(TokenRecord, Option<DateTime<Utc>>), DomainError> {
        let now = Utc::now();
        let expires_at = now + self.config.lifetime(TokenType::Access);
        let access_token = self.codec.issue(subject_id, TokenType::Access, expires_at)?;

        let (refresh_token, refresh_expires_at) = if with_refresh {
            let refresh_expires_at = now + self.config.lifetime(TokenType::Refresh);
            let token = self
                .codec
                .issue(subject_id, TokenType::Refresh, refresh_expires_at)?;
            (Some(token), Some(refresh_expires_at))
        } else {
            (None, None)
        };

        let record = TokenRecord::new(subject_id, access_token, refresh_token, now, expires_at);
        Ok((record, refresh_expires_at))
    }

    /// Best-effort write of the `valid` hint; failures are only logged
    async fn remember_valid(&self, token: &str, expires_at: DateTime<Utc>) {
        let remaining = expires_at - Utc::now();
        if remaining <= ChronoDuration::zero() {
            return;
        }
        if let Err(e) = self
            .cached(self.cache.set(token, VALID_FACT, to_std(remaining)))
            .await
        {
            warn!(
                token = %mask_token(token),
                token_id = %token_fingerprint(token),
                error = %e,
                "Failed to cache valid fact"
            );
        }
    }

    /// Repopulates the `valid` hint after a store hit without holding up
    /// the caller. The task outlives the request that spawned it.
    fn repair_valid_fact(&self, record: TokenRecord) {
        let Some(remaining) = record.remaining(Utc::now()) else {
            return;
        };
        let cache = Arc::clone(&self.cache);
        let deadline = self.config.operation_timeout();

        tokio::spawn(async move {
            let token = record.access_token;
            let outcome =
                tokio::time::timeout(deadline, cache.set(&token, VALID_FACT, to_std(remaining)))
                    .await;
            match outcome {
                Ok(Ok(())) => debug!(token = %mask_token(&token), "Repaired valid fact"),
                Ok(Err(e)) => {
                    warn!(token = %mask_token(&token), error = %e, "Failed to repair valid fact")
                }
                Err(_) => {
                    warn!(token = %mask_token(&token), "Timed out repairing valid fact")
                }
            }
        });
    }

    /// Drops the `valid` hint of a rotated-out access token and blacklists it
    async fn retire_access_token(&self, old: &TokenRecord) {
        let token = old.access_token.as_str();

        if let Err(e) = self.cached(self.cache.delete(token)).await {
            warn!(token = %mask_token(token), error = %e, "Failed to drop valid fact of rotated token");
        }

        let ttl = blacklist_ttl(self.config.blacklist_floor(), Some(old.expires_at), Utc::now());
        if let Err(e) = self
            .cached(self.cache.set(&blacklist_key(token), BLACKLIST_FACT, to_std(ttl)))
            .await
        {
            warn!(token = %mask_token(token), error = %e, "Failed to blacklist rotated token");
        }
    }

    /// Rolls back a failed transaction without waiting past the deadline
    ///
    /// An unfinished transaction also rolls back when dropped, so a timed
    /// out rollback leaves nothing behind.
    async fn abandon(&self, tx: Box<dyn TokenTransaction>) {
        if let Err(e) = self.store(tx.rollback()).await {
            warn!(error = %e, "Failed to roll back token transaction");
        }
    }

    /// Bounds a store call by the operation timeout
    async fn store<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.config.operation_timeout(), call)
            .await
            .unwrap_or_else(|_| Err(DomainError::store("store call timed out")))
    }

    /// Bounds a cache call by the operation timeout
    async fn cached<T>(
        &self,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        tokio::time::timeout(self.config.operation_timeout(), call)
            .await
            .unwrap_or_else(|_| Err(DomainError::cache("cache call timed out")))
    }
}

fn to_std(duration: ChronoDuration) -> Duration {
    duration.to_std().unwrap_or(Duration::ZERO)
}

enum Target<'a> {
    Token(&'a str),
    Subject(&'a str),
}

/// Emits the single completion event every operation produces
fn log_outcome<T>(
    operation: &'static str,
    target: Target<'_>,
    result: &Result<T, DomainError>,
    started: Instant,
) {
    let latency_ms = started.elapsed().as_millis() as u64;
    let (token, token_id, subject) = match target {
        Target::Token(token) => (Some(mask_token(token)), Some(token_fingerprint(token)), None),
        Target::Subject(subject) => (None, None, Some(subject)),
    };

    match result {
        Ok(_) => info!(
            operation,
            token = token.as_deref(),
            token_id = token_id.as_deref(),
            subject,
            outcome = "ok",
            latency_ms,
            "Token operation completed"
        ),
        Err(e) if e.is_retriable() || matches!(e, DomainError::Internal { .. }) => error!(
            operation,
            token = token.as_deref(),
            token_id = token_id.as_deref(),
            subject,
            outcome = e.code(),
            latency_ms,
            error = %e,
            "Token operation failed"
        ),
        Err(e) => warn!(
            operation,
            token = token.as_deref(),
            token_id = token_id.as_deref(),
            subject,
            outcome = e.code(),
            latency_ms,
            "Token operation rejected"
        ),
    }
}
