use actix_web::{web, HttpResponse};

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TokenCache};
use tg_shared::ApiResponse;

use crate::dto::ValidateTokenResponse;
use crate::handlers::error::{token_error, TokenOperation};
use crate::middleware::BearerToken;
use crate::routes::AppState;

/// Handler for POST /token/validate
///
/// Every rejection, whatever the cause, answers 401 with
/// "token invalid or blacklisted".
pub async fn validate<TR, TC, MR, MC>(
    state: web::Data<AppState<TR, TC, MR, MC>>,
    token: BearerToken,
) -> HttpResponse
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    match state.token_service.validate(token.as_str()).await {
        Ok(claims) => HttpResponse::Ok().json(ApiResponse::success(ValidateTokenResponse {
            valid: true,
            claims,
        })),
        Err(e) => token_error(TokenOperation::Validate, &e).to_response(),
    }
}
