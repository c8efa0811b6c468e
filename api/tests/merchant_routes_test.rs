//! Integration tests for active merchant administration

mod common;

use actix_web::test;
use serde_json::{json, Value};

use tg_api::app::create_app;
use tg_core::domain::entities::merchant::Merchant;

use common::{context, context_with, MERCHANT};

#[actix_web::test]
async fn test_sync_loads_active_merchants() {
    let ctx = context_with(
        vec![
            Merchant::new("M003", "Initech", true),
            Merchant::new(MERCHANT, "Acme Payments", true),
            Merchant::new("M900", "Dormant Ltd", false),
        ],
        &["STALE"],
    );
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/data-merchant/sync").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["synced"], 2);

    let req = test::TestRequest::get().uri("/data-merchant/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["merchant_codes"], json!([MERCHANT, "M003"]));
}

#[actix_web::test]
async fn test_sync_without_active_merchants() {
    let ctx = context_with(vec![Merchant::new("M900", "Dormant Ltd", false)], &[MERCHANT]);
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/data-merchant/sync").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "no active merchants found");
}

#[actix_web::test]
async fn test_sync_store_outage() {
    let ctx = context();
    ctx.merchant_repo.set_unavailable(true);
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post().uri("/data-merchant/sync").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
}

#[actix_web::test]
async fn test_add_merchant_code_enables_generation() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/data-merchant/add")
        .set_json(json!({ "merchant_code": "M900" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::post()
        .uri("/token/generate")
        .set_json(json!({ "user_id": "M900", "type": "access" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
}

#[actix_web::test]
async fn test_add_merchant_code_errors() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let cases = [
        (json!({ "merchant_code": MERCHANT }), 409),
        (json!({ "merchant_code": "M404" }), 404),
        (json!({ "merchant_code": "" }), 400),
        (json!({}), 400),
    ];

    for (payload, status) in cases {
        let req = test::TestRequest::post()
            .uri("/data-merchant/add")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), status);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], false);
    }
}

#[actix_web::test]
async fn test_remove_merchant_code_closes_gate() {
    let ctx = context();
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/data-merchant/remove")
        .set_json(json!({ "merchant_code": "M002" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let req = test::TestRequest::post()
        .uri("/data-merchant/remove")
        .set_json(json!({ "merchant_code": "M002" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "merchant code is not active");

    let req = test::TestRequest::post()
        .uri("/token/generate")
        .set_json(json!({ "user_id": "M002", "type": "access" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::get().uri("/data-merchant/list").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["merchant_codes"], json!([MERCHANT]));
}
