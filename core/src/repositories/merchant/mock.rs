//! Mock implementation of MerchantRepository for testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::merchant::Merchant;
use crate::errors::DomainError;

use super::r#trait::MerchantRepository;

/// Mock merchant repository for testing
#[derive(Clone, Default)]
pub struct MockMerchantRepository {
    merchants: Arc<RwLock<Vec<Merchant>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockMerchantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `merchants`
    pub fn with_merchants(merchants: Vec<Merchant>) -> Self {
        Self {
            merchants: Arc::new(RwLock::new(merchants)),
            unavailable: Arc::default(),
        }
    }

    pub async fn insert(&self, merchant: Merchant) {
        let mut merchants = self.merchants.write().await;
        merchants.retain(|m| m.code != merchant.code);
        merchants.push(merchant);
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store("mock merchant store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl MerchantRepository for MockMerchantRepository {
    async fn find_active_codes(&self) -> Result<Vec<String>, DomainError> {
        self.check()?;
        let merchants = self.merchants.read().await;
        let mut codes: Vec<String> = merchants
            .iter()
            .filter(|m| m.is_active)
            .map(|m| m.code.clone())
            .collect();
        codes.sort();
        Ok(codes)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Merchant>, DomainError> {
        self.check()?;
        let merchants = self.merchants.read().await;
        Ok(merchants.iter().find(|m| m.code == code).cloned())
    }
}
