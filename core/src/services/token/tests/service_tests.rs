//! Unit tests for the token lifecycle service

use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use proptest::prelude::*;

use crate::domain::entities::token::{TokenRecord, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{MockTokenRepository, TokenRepository, TokenTransaction};
use crate::services::token::{
    blacklist_key, blacklist_ttl, CacheFailure, MockTokenCache, TokenCodec, TokenService,
    TokenServiceConfig, BLACKLIST_FACT, VALID_FACT,
};

const SECRET: &str = "service-test-secret";

type Service = TokenService<MockTokenRepository, MockTokenCache>;

fn service_with(config: TokenServiceConfig) -> (Service, MockTokenRepository, MockTokenCache) {
    let repository = MockTokenRepository::new();
    let cache = MockTokenCache::new();
    let service = TokenService::new(repository.clone(), Arc::new(cache.clone()), config);
    (service, repository, cache)
}

fn service() -> (Service, MockTokenRepository, MockTokenCache) {
    service_with(TokenServiceConfig::new(SECRET))
}

fn revoked(result: Result<impl std::fmt::Debug, DomainError>) -> bool {
    matches!(result, Err(DomainError::Token(TokenError::RevokedToken)))
}

async fn wait_for_fact(cache: &MockTokenCache, key: &str) -> Option<String> {
    for _ in 0..100 {
        if let Some(value) = cache.peek(key) {
            return Some(value);
        }
        tokio::task::yield_now().await;
    }
    None
}

// ---- issue ----

#[tokio::test]
async fn test_issue_access_only() {
    let (service, repository, cache) = service();

    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();

    assert_eq!(issued.subject_id, "merchant-1");
    assert!(issued.refresh_token.is_none());
    assert_eq!(issued.expires_in(), 15 * 60);
    assert_eq!(repository.len().await, 1);
    assert_eq!(cache.peek(&issued.access_token).as_deref(), Some(VALID_FACT));

    let ttl = cache.ttl_of(&issued.access_token).unwrap();
    assert!(ttl <= StdDuration::from_secs(15 * 60));
    assert!(ttl > StdDuration::from_secs(14 * 60));
}

#[tokio::test]
async fn test_issue_refresh_mints_pair_in_one_record() {
    let (service, repository, _cache) = service();

    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    let refresh_token = issued.refresh_token.clone().unwrap();

    let record = repository
        .find_by_refresh_token(&refresh_token)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.access_token, issued.access_token);
    assert_eq!(repository.len().await, 1);

    let refresh_expiry = issued.refresh_expires_at.unwrap();
    assert!(refresh_expiry - issued.issued_at >= Duration::days(7) - Duration::seconds(1));
}

#[tokio::test]
async fn test_issue_rejects_empty_subject() {
    let (service, repository, _cache) = service();

    let result = service.issue("  ", TokenType::Access).await;
    assert!(matches!(result, Err(DomainError::Validation { .. })));
    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_issue_survives_cache_write_failure() {
    let (service, _repository, cache) = service();
    cache.set_failure(CacheFailure::Writes);

    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    assert!(cache.peek(&issued.access_token).is_none());

    // store remains authoritative
    let claims = service.validate(&issued.access_token).await.unwrap();
    assert_eq!(claims.sub, "merchant-1");
}

#[tokio::test]
async fn test_issue_fails_when_store_unavailable() {
    let (service, repository, cache) = service();
    repository.set_unavailable(true);

    let result = service.issue("merchant-1", TokenType::Access).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    repository.set_unavailable(false);
    assert!(repository.is_empty().await);
    assert!(cache.peek("anything").is_none());
}

// ---- validate ----

#[tokio::test]
async fn test_issue_then_validate_round_trip() {
    let (service, _repository, _cache) = service();

    for token_type in [TokenType::Access, TokenType::Refresh] {
        let issued = service.issue("merchant-1", token_type).await.unwrap();
        let claims = service.validate(&issued.access_token).await.unwrap();
        assert_eq!(claims.sub, "merchant-1");
        assert_eq!(claims.token_type, TokenType::Access);
    }
}

#[tokio::test]
async fn test_validate_unknown_token_is_invalid() {
    let (service, _repository, _cache) = service();

    let result = service.validate("never-issued-token").await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenInvalid))));

    let result = service.validate("").await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenInvalid))));
}

#[tokio::test]
async fn test_validate_falls_back_to_store_and_repairs_cache() {
    let (service, _repository, cache) = service();
    cache.set_failure(CacheFailure::Writes);
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    cache.set_failure(CacheFailure::None);

    service.validate(&issued.access_token).await.unwrap();

    let fact = wait_for_fact(&cache, &issued.access_token).await;
    assert_eq!(fact.as_deref(), Some(VALID_FACT));
}

#[tokio::test]
async fn test_blacklist_fact_beats_stale_valid_fact() {
    let (service, _repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();

    cache.insert(&issued.access_token, VALID_FACT, StdDuration::from_secs(600));
    cache.insert(
        &blacklist_key(&issued.access_token),
        BLACKLIST_FACT,
        StdDuration::from_secs(600),
    );

    assert!(revoked(service.validate(&issued.access_token).await));
}

#[tokio::test]
async fn test_validate_rejects_foreign_signature_even_if_cached() {
    let (service, repository, cache) = service();
    let forged = TokenCodec::new("attacker-secret")
        .issue("merchant-1", TokenType::Access, Utc::now() + Duration::minutes(15))
        .unwrap();

    let now = Utc::now();
    repository
        .save(TokenRecord::new("merchant-1", forged.clone(), None, now, now + Duration::minutes(15)))
        .await
        .unwrap();
    cache.insert(&forged, VALID_FACT, StdDuration::from_secs(600));

    let result = service.validate(&forged).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::SignatureInvalid))));
}

#[tokio::test]
async fn test_validate_expired_token_known_to_store() {
    let mut config = TokenServiceConfig::new(SECRET);
    config.access_token_expiry_secs = 0;
    let (service, _repository, cache) = service_with(config);

    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    assert!(cache.peek(&issued.access_token).is_none());

    let result = service.validate(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::Expired))));
}

#[tokio::test]
async fn test_validate_rejects_refresh_token() {
    let (service, _repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    let refresh_token = issued.refresh_token.unwrap();

    let result = service.validate(&refresh_token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenInvalid))));

    cache.insert(&refresh_token, VALID_FACT, StdDuration::from_secs(600));
    let result = service.validate(&refresh_token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenInvalid))));
}

#[tokio::test]
async fn test_validate_rejects_unexpected_cached_value() {
    let (service, _repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    cache.insert(&issued.access_token, "maybe", StdDuration::from_secs(600));

    let result = service.validate(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::TokenInvalid))));
}

#[tokio::test]
async fn test_validate_fails_closed_when_cache_down() {
    let (service, repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    assert!(repository
        .find_by_access_token(&issued.access_token)
        .await
        .unwrap()
        .is_some());

    cache.set_failure(CacheFailure::All);

    let result = service.validate(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_validate_times_out_on_slow_store() {
    let (service, repository, _cache) = service();
    repository.set_latency(Some(StdDuration::from_secs(30)));

    let result = service.validate("not-cached-token").await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}

// ---- blacklist ----

#[tokio::test]
async fn test_blacklist_revokes_token() {
    let (service, repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();

    service.blacklist(&issued.access_token).await.unwrap();

    assert!(cache.peek(&issued.access_token).is_none());
    assert_eq!(
        cache.peek(&blacklist_key(&issued.access_token)).as_deref(),
        Some(BLACKLIST_FACT)
    );
    assert!(repository.is_empty().await);
    assert!(revoked(service.validate(&issued.access_token).await));
}

#[tokio::test]
async fn test_blacklist_twice_is_idempotent() {
    let (service, _repository, _cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();

    service.blacklist(&issued.access_token).await.unwrap();
    service.blacklist(&issued.access_token).await.unwrap();

    assert!(revoked(service.validate(&issued.access_token).await));
}

#[tokio::test]
async fn test_blacklist_unknown_token_uses_floor_ttl() {
    let (service, _repository, cache) = service();

    service.blacklist("token-the-store-never-saw").await.unwrap();

    let ttl = cache.ttl_of(&blacklist_key("token-the-store-never-saw")).unwrap();
    assert_eq!(ttl, StdDuration::from_secs(15 * 60));
}

#[tokio::test]
async fn test_blacklist_ttl_outlives_long_token() {
    let mut config = TokenServiceConfig::new(SECRET);
    config.access_token_expiry_secs = 3600;
    let (service, _repository, cache) = service_with(config);
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();

    service.blacklist(&issued.access_token).await.unwrap();

    let ttl = cache.ttl_of(&blacklist_key(&issued.access_token)).unwrap();
    assert!(ttl > StdDuration::from_secs(15 * 60));
    assert!(ttl >= StdDuration::from_secs(3590));
}

#[tokio::test]
async fn test_blacklist_reports_cache_write_failure() {
    let (service, _repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    cache.set_failure(CacheFailure::Writes);

    let result = service.blacklist(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::CacheUnavailable { .. })));
}

#[tokio::test]
async fn test_blacklist_survives_store_outage() {
    let (service, repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Access).await.unwrap();
    repository.set_unavailable(true);

    let result = service.blacklist(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert_eq!(
        cache.peek(&blacklist_key(&issued.access_token)).as_deref(),
        Some(BLACKLIST_FACT)
    );
    let ttl = cache.ttl_of(&blacklist_key(&issued.access_token)).unwrap();
    assert!(ttl >= StdDuration::from_secs(14 * 60));

    repository.set_unavailable(false);
    assert!(revoked(service.validate(&issued.access_token).await));
}

#[tokio::test(start_paused = true)]
async fn test_blacklist_records_revocation_when_delete_stalls() {
    let inner = MockTokenRepository::new();
    let record = stored_record(&inner).await;
    let cache = MockTokenCache::new();
    let service = TokenService::new(
        StalledRepository(inner.clone()),
        Arc::new(cache.clone()),
        TokenServiceConfig::new(SECRET),
    );

    let result = tokio::time::timeout(
        StdDuration::from_secs(60),
        service.blacklist(&record.access_token),
    )
    .await
    .expect("blacklist must finish within its deadlines");

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert_eq!(
        cache.peek(&blacklist_key(&record.access_token)).as_deref(),
        Some(BLACKLIST_FACT)
    );
}

// ---- refresh ----

#[tokio::test]
async fn test_refresh_rotates_pair() {
    let (service, repository, _cache) = service();
    let first = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    let first_refresh = first.refresh_token.clone().unwrap();

    let second = service.refresh(&first_refresh).await.unwrap();

    assert_eq!(second.subject_id, "merchant-1");
    assert_ne!(second.access_token, first.access_token);
    assert_ne!(second.refresh_token.as_deref(), Some(first_refresh.as_str()));
    assert_eq!(repository.len().await, 1);

    assert!(revoked(service.validate(&first.access_token).await));
    let claims = service.validate(&second.access_token).await.unwrap();
    assert_eq!(claims.sub, "merchant-1");
}

#[tokio::test]
async fn test_refresh_token_is_single_use() {
    let (service, _repository, _cache) = service();
    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    let refresh_token = issued.refresh_token.unwrap();

    service.refresh(&refresh_token).await.unwrap();
    let replay = service.refresh(&refresh_token).await;

    assert!(matches!(replay, Err(DomainError::Token(TokenError::InvalidRefreshToken))));
}

#[tokio::test]
async fn test_concurrent_refresh_has_one_winner() {
    let (service, repository, _cache) = service();
    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    let refresh_token = issued.refresh_token.unwrap();

    let (a, b) = tokio::join!(service.refresh(&refresh_token), service.refresh(&refresh_token));

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    assert_eq!(repository.len().await, 1);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let (service, repository, _cache) = service();
    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();

    // an access token stored in the refresh column must still be refused
    let now = Utc::now();
    repository
        .save(TokenRecord::new(
            "merchant-1",
            "unrelated-access",
            Some(issued.access_token.clone()),
            now,
            now + Duration::minutes(15),
        ))
        .await
        .unwrap();

    let result = service.refresh(&issued.access_token).await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidRefreshToken))));
}

#[tokio::test]
async fn test_refresh_rotation_survives_cache_outage() {
    let (service, repository, cache) = service();
    let issued = service.issue("merchant-1", TokenType::Refresh).await.unwrap();
    cache.set_failure(CacheFailure::Writes);

    let rotated = service.refresh(&issued.refresh_token.unwrap()).await.unwrap();
    assert!(repository
        .find_by_access_token(&rotated.access_token)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_stark_scenario() {
    let (service, _repository, _cache) = service();

    let issued = service.issue("STARK-1225", TokenType::Access).await.unwrap();
    let claims = service.validate(&issued.access_token).await.unwrap();
    assert_eq!(claims.sub, "STARK-1225");
    assert_eq!(claims.token_type, TokenType::Access);

    service.blacklist(&issued.access_token).await.unwrap();
    assert!(revoked(service.validate(&issued.access_token).await));

    let result = service.refresh("garbage-refresh-string").await;
    assert!(matches!(result, Err(DomainError::Token(TokenError::InvalidRefreshToken))));
}

// ---- blacklist TTL ----

#[test]
fn test_blacklist_ttl_without_record_is_floor() {
    let floor = Duration::minutes(15);
    assert_eq!(blacklist_ttl(floor, None, Utc::now()), floor);
}

proptest! {
    #[test]
    fn blacklist_ttl_covers_floor_and_remaining_lifetime(
        floor_secs in 1i64..86_400,
        offset_secs in -86_400i64..2_592_000,
    ) {
        let now = Utc::now();
        let floor = Duration::seconds(floor_secs);
        let expires_at = now + Duration::seconds(offset_secs);

        let ttl = blacklist_ttl(floor, Some(expires_at), now);

        prop_assert!(ttl >= floor);
        prop_assert!(ttl >= expires_at - now);
        prop_assert!(ttl == floor || ttl == expires_at - now);
    }
}

// ---- stalled store ----

/// Store whose reads work but whose transactions never make progress
struct StalledRepository(MockTokenRepository);

struct StalledTransaction;

#[async_trait]
impl TokenRepository for StalledRepository {
    async fn save(&self, record: TokenRecord) -> Result<TokenRecord, DomainError> {
        self.0.save(record).await
    }

    async fn find_by_access_token(
        &self,
        access_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.0.find_by_access_token(access_token).await
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<TokenRecord>, DomainError> {
        self.0.find_by_refresh_token(refresh_token).await
    }

    async fn delete_by_access_token(&self, access_token: &str) -> Result<u64, DomainError> {
        self.0.delete_by_access_token(access_token).await
    }

    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError> {
        Ok(Box::new(StalledTransaction))
    }
}

#[async_trait]
impl TokenTransaction for StalledTransaction {
    async fn save(&mut self, _record: TokenRecord) -> Result<TokenRecord, DomainError> {
        std::future::pending().await
    }

    async fn delete_by_access_token(&mut self, _access_token: &str) -> Result<u64, DomainError> {
        std::future::pending().await
    }

    async fn delete_by_refresh_token(
        &mut self,
        _refresh_token: &str,
    ) -> Result<u64, DomainError> {
        std::future::pending().await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        std::future::pending().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        std::future::pending().await
    }
}

async fn stored_record(repository: &MockTokenRepository) -> TokenRecord {
    let codec = TokenCodec::new(SECRET);
    let now = Utc::now();
    let expires_at = now + Duration::minutes(15);
    let access = codec.issue("merchant-1", TokenType::Access, expires_at).unwrap();
    let refresh = codec
        .issue("merchant-1", TokenType::Refresh, now + Duration::days(7))
        .unwrap();
    repository
        .save(TokenRecord::new("merchant-1", access, Some(refresh), now, expires_at))
        .await
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_issue_gives_up_on_stalled_transaction() {
    let service = TokenService::new(
        StalledRepository(MockTokenRepository::new()),
        Arc::new(MockTokenCache::new()),
        TokenServiceConfig::new(SECRET),
    );

    let result = tokio::time::timeout(
        StdDuration::from_secs(60),
        service.issue("merchant-1", TokenType::Access),
    )
    .await
    .expect("issue must finish within its deadlines");

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
}

#[tokio::test(start_paused = true)]
async fn test_refresh_gives_up_on_stalled_transaction() {
    let inner = MockTokenRepository::new();
    let record = stored_record(&inner).await;
    let service = TokenService::new(
        StalledRepository(inner.clone()),
        Arc::new(MockTokenCache::new()),
        TokenServiceConfig::new(SECRET),
    );

    let refresh_token = record.refresh_token.clone().unwrap();
    let result = tokio::time::timeout(StdDuration::from_secs(60), service.refresh(&refresh_token))
        .await
        .expect("refresh must finish within its deadlines");

    assert!(matches!(result, Err(DomainError::StoreUnavailable { .. })));
    assert_eq!(inner.len().await, 1);
}
