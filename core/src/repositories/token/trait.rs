//! Token repository trait defining the interface for issued token persistence.

use async_trait::async_trait;

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainError;

/// Repository trait for TokenRecord persistence operations
///
/// The store is the authoritative source of truth for which tokens were
/// issued and not yet revoked or rotated. The cache in front of it may be
/// stale or empty at any time.
///
/// Lookups return `Ok(None)` when no record matches; `Err` always means the
/// store itself failed.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new record outside any transaction
    ///
    /// # Returns
    /// * `Ok(TokenRecord)` - The saved record with its store-assigned id
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token)
    async fn save(&self, record: TokenRecord) -> Result<TokenRecord, DomainError>;

    /// Find the record whose access token equals `access_token`
    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError>;

    /// Find the record whose refresh token equals `refresh_token`
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError>;

    /// Delete by access token outside any transaction
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed (0 when nothing matched)
    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, DomainError>;

    /// Open a transaction
    ///
    /// The returned handle must be finished with `commit` or `rollback`.
    /// Dropping it unfinished discards every change made through it.
    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError>;
}

/// Unit of work over the token store
#[async_trait]
pub trait TokenTransaction: Send {
    async fn save(&mut self, record: TokenRecord) -> Result<TokenRecord, DomainError>;

    async fn delete_by_access_token(&mut self, access_token: &str) -> Result<u64, DomainError>;

    /// Delete the record owning `refresh_token`
    ///
    /// Returns the number of rows removed; a concurrent rotation of the same
    /// refresh token that committed first leaves 0 rows for the loser.
    async fn delete_by_refresh_token(&mut self, refresh_token: &str)
        -> Result<u64, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}
