use actix_web::{web, HttpResponse};
use validator::Validate;

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::{token_error, ApiError, TokenOperation, INVALID_BODY};
use crate::routes::AppState;

/// Handler for POST /token/refresh
///
/// Exchanges a refresh token for a new pair. A refresh token is accepted
/// once; the access token issued alongside it is blacklisted.
///
/// # Headers
///
/// ```text
/// X-Merchant-Code: {merchant_code}
/// ```
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body
/// - 401 Unauthorized: "invalid refresh token" for every rejected token
/// - 503 Service Unavailable: Store or cache temporarily unreachable
pub async fn refresh<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    if request.validate().is_err() {
        return ApiError::bad_request(INVALID_BODY).to_response();
    }

    match state.token_service.refresh(&request.refresh_token).await {
        Ok(issued) => HttpResponse::Ok().json(ApiResponse::success(TokenResponse::from_issued(
            issued,
            state.response_utc_offset_hours,
        ))),
        Err(e) => token_error(TokenOperation::Refresh, &e).to_response(),
    }
}
