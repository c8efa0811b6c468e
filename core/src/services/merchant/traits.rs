//! Traits for tenant gating and the active merchant set

use async_trait::async_trait;

use crate::errors::DomainError;

/// Decides whether a tenant may use the token lifecycle at all
#[async_trait]
pub trait TenantGate: Send + Sync {
    async fn is_active(&self, tenant_id: &str) -> Result<bool, DomainError>;
}

/// Cached set of active merchant codes
#[async_trait]
pub trait MerchantCache: Send + Sync {
    /// Atomically replace the whole set with `codes`
    async fn replace_all(&self, codes: &[String]) -> Result<(), DomainError>;
    async fn contains(&self, code: &str) -> Result<bool, DomainError>;
    /// Add `code`; returns false if it was already present
    async fn add(&self, code: &str) -> Result<bool, DomainError>;
    /// Remove `code`; returns false if it was not present
    async fn remove(&self, code: &str) -> Result<bool, DomainError>;
    /// Every code in the set, ascending
    async fn members(&self) -> Result<Vec<String>, DomainError>;
}
