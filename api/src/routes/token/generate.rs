use actix_web::{web, HttpResponse};
use tracing::error;
use validator::Validate;

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TenantGate, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::{GenerateTokenRequest, TokenResponse};
use crate::handlers::error::{
    token_error, ApiError, TokenOperation, INVALID_BODY, MERCHANT_INACTIVE,
    MERCHANT_LOOKUP_FAILED,
};
use crate::routes::AppState;

/// Handler for POST /token/generate
///
/// Issues tokens to an active merchant.
///
/// # Request Body
///
/// ```json
/// {
///     "user_id": "M001",
///     "type": "refresh"
/// }
/// ```
///
/// `type` is `access` for an access token only or `refresh` for an access
/// and refresh token pair.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": true,
///     "message": "SUCCESS",
///     "data": {
///         "user_id": "M001",
///         "access_token": "eyJ...",
///         "refresh_token": "eyJ...",
///         "expires_in": 900,
///         "created_at": "2024-02-01T03:30:00.000+07:00",
///         "expires_at": "2024-02-01T03:45:00.000+07:00"
///     }
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body or unknown token type
/// - 401 Unauthorized: `user_id` is not an active merchant
/// - 500 Internal Server Error: Token could not be issued
/// - 503 Service Unavailable: Store or cache temporarily unreachable
pub async fn generate<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
    request: web::Json<GenerateTokenRequest>,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    let request = request.into_inner();
    if request.validate().is_err() {
        return ApiError::bad_request(INVALID_BODY).to_response();
    }

    match state.merchant_service.is_active(&request.user_id).await {
        Ok(true) => {}
        Ok(false) => return ApiError::unauthorized(MERCHANT_INACTIVE).to_response(),
        Err(e) => {
            error!(merchant = %request.user_id, error = %e, "Merchant gate lookup failed");
            return ApiError::internal(MERCHANT_LOOKUP_FAILED).to_response();
        }
    }

    match state
        .token_service
        .issue(&request.user_id, request.token_type)
        .await
    {
        Ok(issued) => HttpResponse::Ok().json(ApiResponse::success(TokenResponse::from_issued(
            issued,
            state.response_utc_offset_hours,
        ))),
        Err(e) => token_error(TokenOperation::Generate, &e).to_response(),
    }
}
