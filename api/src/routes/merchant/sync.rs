use actix_web::{web, HttpResponse};
use std::time::Instant;
use tracing::{error, info};

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::SyncMerchantResponse;
use crate::handlers::error::merchant_error;
use crate::routes::AppState;

/// Handler for POST /data-merchant/sync
///
/// Reloads the active merchant set from the merchant table.
pub async fn sync_merchant_codes<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    let started = Instant::now();

    match state.merchant_service.sync_active_codes().await {
        Ok(synced) => {
            info!(
                endpoint = "/data-merchant/sync",
                synced,
                duration_ms = started.elapsed().as_millis() as u64,
                "Merchant code sync completed"
            );
            HttpResponse::Ok().json(ApiResponse::success(SyncMerchantResponse { synced }))
        }
        Err(e) => {
            error!(
                endpoint = "/data-merchant/sync",
                duration_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Failed to sync merchant codes"
            );
            merchant_error(&e, "Failed to sync merchant code list").to_response()
        }
    }
}
