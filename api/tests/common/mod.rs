//! Shared setup for API integration tests

#![allow(dead_code)]

use actix_web::web;
use std::sync::Arc;

use tg_api::routes::AppState;
use tg_core::domain::entities::merchant::Merchant;
use tg_core::domain::entities::token::{IssuedTokens, TokenType};
use tg_core::repositories::{MockMerchantRepository, MockTokenRepository};
use tg_core::services::{
    MerchantService, MockMerchantCache, MockTokenCache, TokenService, TokenServiceConfig,
};
use tg_shared::ServerConfig;

pub const MERCHANT: &str = "M001";
pub const SECRET: &str = "api-test-secret";

pub type TestState =
    AppState<MockTokenRepository, MockTokenCache, MockMerchantRepository, MockMerchantCache>;

/// Application state plus handles on the mocks behind it
pub struct TestContext {
    pub state: web::Data<TestState>,
    pub token_repo: MockTokenRepository,
    pub token_cache: MockTokenCache,
    pub merchant_repo: MockMerchantRepository,
    pub merchant_cache: MockMerchantCache,
}

impl TestContext {
    /// Issue tokens directly through the service, bypassing HTTP
    pub async fn issue(&self, token_type: TokenType) -> IssuedTokens {
        self.state
            .token_service
            .issue(MERCHANT, token_type)
            .await
            .expect("issue should succeed")
    }
}

/// Merchants M001 and M002 active and cached, M900 registered but inactive
pub fn context() -> TestContext {
    context_with(
        vec![
            Merchant::new(MERCHANT, "Acme Payments", true),
            Merchant::new("M002", "Globex", true),
            Merchant::new("M900", "Dormant Ltd", false),
        ],
        &[MERCHANT, "M002"],
    )
}

pub fn context_with(merchants: Vec<Merchant>, active: &[&str]) -> TestContext {
    let token_repo = MockTokenRepository::new();
    let token_cache = MockTokenCache::new();
    let merchant_repo = MockMerchantRepository::with_merchants(merchants);
    let merchant_cache = MockMerchantCache::with_codes(active.iter().copied());

    let token_service = Arc::new(TokenService::new(
        token_repo.clone(),
        Arc::new(token_cache.clone()),
        TokenServiceConfig::new(SECRET),
    ));
    let merchant_service = Arc::new(MerchantService::new(
        merchant_repo.clone(),
        merchant_cache.clone(),
    ));

    TestContext {
        state: web::Data::new(AppState::new(
            token_service,
            merchant_service,
            &ServerConfig::default(),
        )),
        token_repo,
        token_cache,
        merchant_repo,
        merchant_cache,
    }
}
