use actix_web::{web, HttpResponse};

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::handlers::error::{token_error, TokenOperation};
use crate::middleware::BearerToken;
use crate::routes::AppState;

/// Handler for POST /token/logout
///
/// Blacklists the presented access token. Repeating the call for the same
/// token succeeds again.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// X-Merchant-Code: {merchant_code}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "status": true,
///     "message": "SUCCESS",
///     "data": "logout success"
/// }
/// ```
pub async fn logout<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
    token: BearerToken,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    match state.token_service.blacklist(token.as_str()).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::success("logout success")),
        Err(e) => token_error(TokenOperation::Logout, &e).to_response(),
    }
}
