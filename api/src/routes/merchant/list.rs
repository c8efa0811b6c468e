use actix_web::{web, HttpResponse};

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::ActiveMerchantsResponse;
use crate::handlers::error::merchant_error;
use crate::routes::AppState;

/// Handler for GET /data-merchant/list
pub async fn list_merchant_codes<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    match state.merchant_service.list_active_codes().await {
        Ok(merchant_codes) => {
            HttpResponse::Ok().json(ApiResponse::success(ActiveMerchantsResponse { merchant_codes }))
        }
        Err(e) => merchant_error(&e, "Failed to list merchant codes").to_response(),
    }
}
