//! Route handlers grouped by resource

pub mod merchant;
pub mod token;

use std::sync::Arc;

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, MerchantService, TokenCache, TokenService};
use tg_shared::ServerConfig;

/// Application state that holds shared services
pub struct AppState<TR, TC, MR, MC>
where
    TR: TokenRepository,
    TC: TokenCache + 'static,
    MR: MerchantRepository,
    MC: MerchantCache,
{
    pub token_service: Arc<TokenService<TR, TC>>,
    pub merchant_service: Arc<MerchantService<MR, MC>>,
    /// UTC offset for timestamps rendered in responses
    pub response_utc_offset_hours: i32,
    pub max_payload_size: usize,
}

impl<TR, TC, MR, MC> AppState<TR, TC, MR, MC>
where
    TR: TokenRepository,
    TC: TokenCache + 'static,
    MR: MerchantRepository,
    MC: MerchantCache,
{
    pub fn new(
        token_service: Arc<TokenService<TR, TC>>,
        merchant_service: Arc<MerchantService<MR, MC>>,
        server: &ServerConfig,
    ) -> Self {
        Self {
            token_service,
            merchant_service,
            response_utc_offset_hours: server.response_utc_offset_hours,
            max_payload_size: server.max_payload_size,
        }
    }
}
