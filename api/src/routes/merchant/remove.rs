use actix_web::{web, HttpResponse};
use std::time::Instant;
use tracing::{info, warn};
use validator::Validate;

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::MerchantCodeRequest;
use crate::handlers::error::{merchant_error, ApiError};
use crate::routes::AppState;

/// Handler for POST /data-merchant/remove
///
/// Takes a merchant out of the active set. Tokens already issued to it stay
/// valid until they expire or are blacklisted, but the tenant gate rejects
/// its further requests.
pub async fn remove_merchant_code<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
    request: web::Json<MerchantCodeRequest>,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    let started = Instant::now();
    if request.validate().is_err() {
        return ApiError::bad_request("merchant_code is required").to_response();
    }

    match state
        .merchant_service
        .remove_code(&request.merchant_code)
        .await
    {
        Ok(()) => {
            info!(
                endpoint = "/data-merchant/remove",
                merchant = %request.merchant_code,
                duration_ms = started.elapsed().as_millis() as u64,
                "Merchant code removed"
            );
            HttpResponse::Ok().json(ApiResponse::success("Merchant code successfully removed"))
        }
        Err(e) => {
            warn!(
                endpoint = "/data-merchant/remove",
                merchant = %request.merchant_code,
                duration_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Failed to remove merchant code"
            );
            merchant_error(&e, "Failed to remove merchant code").to_response()
        }
    }
}
