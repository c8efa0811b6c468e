//! In-memory implementation of TokenRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainError;

use super::r#trait::{TokenRepository, TokenTransaction};

type Records = HashMap<i64, TokenRecord>;

/// Mock token repository for testing
///
/// Clones share state, so a test can keep a handle after moving one into a
/// service. A transaction holds the write lock for its whole lifetime, which
/// serializes transactions the way row locks would.
#[derive(Clone, Default)]
pub struct MockTokenRepository {
    records: Arc<RwLock<Records>>,
    next_id: Arc<AtomicI64>,
    unavailable: Arc<AtomicBool>,
    latency: Arc<std::sync::Mutex<Option<Duration>>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Delay every subsequent call by `latency`
    pub fn set_latency(&self, latency: Option<Duration>) {
        if let Ok(mut guard) = self.latency.lock() {
            *guard = latency;
        }
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of every stored record
    pub async fn records(&self) -> Vec<TokenRecord> {
        self.records.read().await.values().cloned().collect()
    }

    async fn check(&self) -> Result<(), DomainError> {
        let latency = self.latency.lock().ok().and_then(|guard| *guard);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store("mock store unavailable"));
        }
        Ok(())
    }
}

fn insert(records: &mut Records, next_id: &AtomicI64, mut record: TokenRecord) -> Result<TokenRecord, DomainError> {
    let duplicate = records.values().any(|existing| {
        existing.access_token == record.access_token
            || (record.refresh_token.is_some() && existing.refresh_token == record.refresh_token)
    });
    if duplicate {
        return Err(DomainError::Internal {
            message: "duplicate token".to_string(),
        });
    }

    record.id = next_id.fetch_add(1, Ordering::SeqCst) + 1;
    records.insert(record.id, record.clone());
    Ok(record)
}

fn remove_where(records: &mut Records, matches: impl Fn(&TokenRecord) -> bool) -> u64 {
    let before = records.len();
    records.retain(|_, record| !matches(record));
    (before - records.len()) as u64
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        self.check().await?;
        let mut records = self.records.write().await;
        insert(&mut records, &self.next_id, record)
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.check().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.access_token == access_token)
            .cloned())
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.check().await?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.refresh_token.as_deref() == Some(refresh_token))
            .cloned())
    }

    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, DomainError> {
        self.check().await?;
        let mut records = self.records.write().await;
        Ok(remove_where(&mut records, |r| r.access_token == access_token))
    }

    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError> {
        self.check().await?;
        let guard = self.records.clone().write_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MockTokenTransaction {
            guard,
            snapshot,
            next_id: self.next_id.clone(),
            unavailable: self.unavailable.clone(),
            finished: false,
        }))
    }
}

/// Transaction over [`MockTokenRepository`]
///
/// Changes are applied in place and undone from a snapshot on rollback or
/// when the handle is dropped without commit.
pub struct MockTokenTransaction {
    guard: OwnedRwLockWriteGuard<Records>,
    snapshot: Records,
    next_id: Arc<AtomicI64>,
    unavailable: Arc<AtomicBool>,
    finished: bool,
}

impl MockTokenTransaction {
    fn check(&self) -> Result<(), DomainError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::store("mock store unavailable"));
        }
        Ok(())
    }

    fn restore(&mut self) {
        *self.guard = std::mem::take(&mut self.snapshot);
    }
}

#[async_trait]
impl TokenTransaction for MockTokenTransaction {
    async fn save(&mut self, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        self.check()?;
        insert(&mut self.guard, &self.next_id, record)
    }

    async fn delete_by_access_token(&mut self, access_token: &str) -> Result<u64, DomainError> {
        self.check()?;
        Ok(remove_where(&mut self.guard, |r| r.access_token == access_token))
    }

    async fn delete_by_refresh_token(
        &mut self,
        refresh_token: &str,
    ) -> Result<u64, DomainError> {
        self.check()?;
        Ok(remove_where(&mut self.guard, |r| {
            r.refresh_token.as_deref() == Some(refresh_token)
        }))
    }

    async fn commit(mut self: Box<Self>) -> Result<(), DomainError> {
        if let Err(e) = self.check() {
            self.restore();
            self.finished = true;
            return Err(e);
        }
        self.finished = true;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<(), DomainError> {
        self.restore();
        self.finished = true;
        Ok(())
    }
}

impl Drop for MockTokenTransaction {
    fn drop(&mut self) {
        if !self.finished {
            self.restore();
        }
    }
}
