//! Merchant repository trait (read-only view of the merchant registry)

use async_trait::async_trait;

use crate::domain::entities::merchant::Merchant;
use crate::errors::DomainError;

/// Read access to the authoritative merchant table
#[async_trait]
pub trait MerchantRepository: Send + Sync {
    /// Codes of every merchant with `is_active` set, ascending
    async fn find_active_codes(&self) -> Result<Vec<String>, DomainError>;

    /// Find a merchant by its code regardless of activation state
    async fn find_by_code(&self, code: &str) -> Result<Option<Merchant>, DomainError>;
}
