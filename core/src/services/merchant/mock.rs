//! In-memory MerchantCache and TenantGate for testing

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::DomainError;

use super::traits::{MerchantCache, TenantGate};

/// Mock active-merchant set; clones share state
#[derive(Clone, Default)]
pub struct MockMerchantCache {
    codes: Arc<Mutex<BTreeSet<String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MockMerchantCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cache = Self::default();
        if let Ok(mut set) = cache.codes.lock() {
            set.extend(codes.into_iter().map(Into::into));
        }
        cache
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn with_set<T>(&self, f: impl FnOnce(&mut BTreeSet<String>) -> T) -> Result<T, DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::cache("mock merchant cache unavailable"));
        }
        let mut set = self
            .codes
            .lock()
            .map_err(|_| DomainError::cache("mock merchant cache poisoned"))?;
        Ok(f(&mut set))
    }
}

#[async_trait]
impl MerchantCache for MockMerchantCache {
    async fn replace_all(&self, codes: &[String]) -> Result<(), DomainError> {
        self.with_set(|set| {
            set.clear();
            set.extend(codes.iter().cloned());
        })
    }

    async fn contains(&self, code: &str) -> Result<bool, DomainError> {
        self.with_set(|set| set.contains(code))
    }

    async fn add(&self, code: &str) -> Result<bool, DomainError> {
        self.with_set(|set| set.insert(code.to_string()))
    }

    async fn remove(&self, code: &str) -> Result<bool, DomainError> {
        self.with_set(|set| set.remove(code))
    }

    async fn members(&self) -> Result<Vec<String>, DomainError> {
        self.with_set(|set| set.iter().cloned().collect())
    }
}

#[async_trait]
impl TenantGate for MockMerchantCache {
    async fn is_active(&self, tenant_id: &str) -> Result<bool, DomainError> {
        self.contains(tenant_id).await
    }
}
