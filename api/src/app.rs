//! Application factory
//!
//! Builds the actix-web application around an [`AppState`]. Tracing of
//! requests is attached by the caller so that tests can run the bare app.

use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, Error, HttpResponse,
};
use serde_json::Value;
use std::sync::Arc;

use tg_core::repositories::{MerchantRepository, TokenRepository};
use tg_core::services::{MerchantCache, TenantGate, TokenCache};
use tg_shared::{ApiResponse, HealthResponse};

use crate::handlers::error::{ApiError, INVALID_BODY};
use crate::middleware::MerchantGate;
use crate::routes::merchant::{
    add_merchant_code, list_merchant_codes, remove_merchant_code, sync_merchant_codes,
};
use crate::routes::token::{generate, logout, refresh, validate};
use crate::routes::AppState;

/// Create and configure the application with all dependencies
pub fn create_app<TR, TC, MR, MC>(
    app_state: web::Data<AppState<TR, TC, MR, MC>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = Error,
        InitError = (),
    >,
>
where
    TR: TokenRepository + 'static,
    TC: TokenCache + 'static,
    MR: MerchantRepository + 'static,
    MC: MerchantCache + 'static,
{
    let gate: Arc<dyn TenantGate> = app_state.merchant_service.clone();
    let merchant_gate = MerchantGate::new(gate);

    let json_config = web::JsonConfig::default()
        .limit(app_state.max_payload_size)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected request body");
            ApiError::bad_request(INVALID_BODY).into()
        });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/token")
                .route("/generate", web::post().to(generate::<TR, TC, MR, MC>))
                .route(
                    "/refresh",
                    web::post()
                        .to(refresh::<TR, TC, MR, MC>)
                        .wrap(merchant_gate.clone()),
                )
                .route(
                    "/validate",
                    web::post()
                        .to(validate::<TR, TC, MR, MC>)
                        .wrap(merchant_gate.clone().with_bearer()),
                )
                .route(
                    "/logout",
                    web::post()
                        .to(logout::<TR, TC, MR, MC>)
                        .wrap(merchant_gate.with_bearer()),
                ),
        )
        .service(
            web::scope("/data-merchant")
                .route("/sync", web::post().to(sync_merchant_codes::<TR, TC, MR, MC>))
                .route("/add", web::post().to(add_merchant_code::<TR, TC, MR, MC>))
                .route("/remove", web::post().to(remove_merchant_code::<TR, TC, MR, MC>))
                .route("/list", web::get().to(list_merchant_codes::<TR, TC, MR, MC>)),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::healthy(
        "tokengate-api",
        env!("CARGO_PKG_VERSION"),
    ))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::<Value>::failure(
        "The requested resource was not found",
    ))
}
