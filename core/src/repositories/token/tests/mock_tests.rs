//! Unit tests for mock token repository implementation

use chrono::{Duration, Utc};

use crate::domain::entities::token::TokenRecord;
use crate::errors::DomainError;
use crate::repositories::token::{MockTokenRepository, TokenRepository};

fn record(access: &str, refresh: Option<&str>) -> TokenRecord {
    let now = Utc::now();
    TokenRecord::new(
        "merchant-1",
        access,
        refresh.map(str::to_string),
        now,
        now + Duration::minutes(15),
    )
}

#[tokio::test]
async fn test_save_and_find() {
    let repo = MockTokenRepository::new();

    let saved = repo.save(record("at-1", Some("rt-1"))).await.unwrap();
    assert!(saved.id > 0);

    let by_access = repo.find_by_access_token("at-1").await.unwrap().unwrap();
    assert_eq!(by_access.id, saved.id);

    let by_refresh = repo.find_by_refresh_token("rt-1").await.unwrap().unwrap();
    assert_eq!(by_refresh.access_token, "at-1");

    assert!(repo.find_by_access_token("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_access_token_rejected() {
    let repo = MockTokenRepository::new();
    repo.save(record("at-1", None)).await.unwrap();

    let result = repo.save(record("at-1", None)).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_transaction_commit_applies_changes() {
    let repo = MockTokenRepository::new();
    repo.save(record("at-old", Some("rt-old"))).await.unwrap();

    let mut tx = repo.begin().await.unwrap();
    assert_eq!(tx.delete_by_refresh_token("rt-old").await.unwrap(), 1);
    tx.save(record("at-new", Some("rt-new"))).await.unwrap();
    tx.commit().await.unwrap();

    assert!(repo.find_by_refresh_token("rt-old").await.unwrap().is_none());
    assert!(repo.find_by_refresh_token("rt-new").await.unwrap().is_some());
}

#[tokio::test]
async fn test_transaction_rollback_discards_changes() {
    let repo = MockTokenRepository::new();
    repo.save(record("at-old", Some("rt-old"))).await.unwrap();

    let mut tx = repo.begin().await.unwrap();
    tx.delete_by_access_token("at-old").await.unwrap();
    tx.save(record("at-new", None)).await.unwrap();
    tx.rollback().await.unwrap();

    assert!(repo.find_by_access_token("at-old").await.unwrap().is_some());
    assert!(repo.find_by_access_token("at-new").await.unwrap().is_none());
}

#[tokio::test]
async fn test_dropped_transaction_rolls_back() {
    let repo = MockTokenRepository::new();

    {
        let mut tx = repo.begin().await.unwrap();
        tx.save(record("at-1", None)).await.unwrap();
    }

    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_second_delete_of_same_refresh_token_finds_nothing() {
    let repo = MockTokenRepository::new();
    repo.save(record("at-1", Some("rt-1"))).await.unwrap();

    let mut first = repo.begin().await.unwrap();
    assert_eq!(first.delete_by_refresh_token("rt-1").await.unwrap(), 1);
    first.commit().await.unwrap();

    let mut second = repo.begin().await.unwrap();
    assert_eq!(second.delete_by_refresh_token("rt-1").await.unwrap(), 0);
    second.rollback().await.unwrap();
}

#[tokio::test]
async fn test_unavailable_store() {
    let repo = MockTokenRepository::new();
    repo.set_unavailable(true);

    let result = repo.find_by_access_token("at").await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));

    repo.set_unavailable(false);
    assert!(repo.find_by_access_token("at").await.unwrap().is_none());
}
