//! Merchant activation service

use async_trait::async_trait;
use tracing::{info, warn};

use crate::errors::{DomainError, MerchantError};
use crate::repositories::MerchantRepository;

use super::traits::{MerchantCache, TenantGate};

/// Keeps the cached active-merchant set in line with the merchant table
/// and answers tenant gate queries from it
pub struct MerchantService<R: MerchantRepository, K: MerchantCache> {
    repository: R,
    cache: K,
}

impl<R: MerchantRepository, K: MerchantCache> MerchantService<R, K> {
    pub fn new(repository: R, cache: K) -> Self {
        Self { repository, cache }
    }

    /// Reloads the active set from the database
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - Number of active codes now cached
    /// * `Err(NoActiveMerchants)` - The table has no active merchant
    pub async fn sync_active_codes(&self) -> Result<usize, DomainError> {
        let codes = self.repository.find_active_codes().await?;
        if codes.is_empty() {
            warn!("No active merchants found in database");
            return Err(MerchantError::NoActiveMerchants.into());
        }

        self.cache.replace_all(&codes).await?;
        info!(count = codes.len(), "Synced active merchant codes");
        Ok(codes.len())
    }

    /// Adds a registered merchant to the active set
    pub async fn add_code(&self, code: &str) -> Result<(), DomainError> {
        let code = normalize(code)?;

        if self.repository.find_by_code(code).await?.is_none() {
            return Err(DomainError::NotFound {
                resource: format!("merchant {}", code),
            });
        }

        if !self.cache.add(code).await? {
            return Err(MerchantError::AlreadyExists {
                code: code.to_string(),
            }
            .into());
        }

        info!(merchant = code, "Merchant code added to active set");
        Ok(())
    }

    /// Removes a code from the active set
    pub async fn remove_code(&self, code: &str) -> Result<(), DomainError> {
        let code = normalize(code)?;

        if !self.cache.remove(code).await? {
            return Err(MerchantError::NotRegistered {
                code: code.to_string(),
            }
            .into());
        }

        info!(merchant = code, "Merchant code removed from active set");
        Ok(())
    }

    pub async fn list_active_codes(&self) -> Result<Vec<String>, DomainError> {
        self.cache.members().await
    }
}

#[async_trait]
impl<R: MerchantRepository, K: MerchantCache> TenantGate for MerchantService<R, K> {
    async fn is_active(&self, tenant_id: &str) -> Result<bool, DomainError> {
        let code = tenant_id.trim();
        if code.is_empty() {
            return Ok(false);
        }
        self.cache.contains(code).await
    }
}

fn normalize(code: &str) -> Result<&str, DomainError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DomainError::Validation {
            message: "merchant code is required".to_string(),
        });
    }
    Ok(code)
}
