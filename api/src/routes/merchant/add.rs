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

/// Handler for POST /data-merchant/add
///
/// Puts a registered merchant into the active set.
///
/// ## Errors
/// - 400 Bad Request: `merchant_code` missing or empty
/// - 404 Not Found: No merchant with that code exists
/// - 409 Conflict: The code is already active
pub async fn add_merchant_code<TR, TC, MR, MC>(
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

    match state.merchant_service.add_code(&request.merchant_code).await {
        Ok(()) => {
            info!(
                endpoint = "/data-merchant/add",
                merchant = %request.merchant_code,
                duration_ms = started.elapsed().as_millis() as u64,
                "Merchant code added"
            );
            HttpResponse::Ok().json(ApiResponse::success("Merchant code successfully added"))
        }
        Err(e) => {
            warn!(
                endpoint = "/data-merchant/add",
                merchant = %request.merchant_code,
                duration_ms = started.elapsed().as_millis() as u64,
                error = %e,
                "Failed to add merchant code"
            );
            merchant_error(&e, "Failed to add merchant code").to_response()
        }
    }
}
