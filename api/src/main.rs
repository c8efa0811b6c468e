use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_actix_web::TracingLogger;

use tg_api::app::create_app;
use tg_api::routes::AppState;
use tg_api::telemetry::init_tracing;
use tg_core::services::{MerchantService, TokenService, TokenServiceConfig};
use tg_infra::{
    DatabasePool, PgMerchantRepository, PgTokenRepository, RedisClient, RedisMerchantCache,
    RedisTokenCache,
};
use tg_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;
    config.validate().context("invalid configuration")?;

    info!(
        environment = %config.environment,
        bind = %config.server.bind_address(),
        "Starting TokenGate API server"
    );

    let db = DatabasePool::new(&config.database)
        .await
        .context("failed to connect to database")?;
    if config.database.run_migrations {
        db.run_migrations()
            .await
            .context("failed to run database migrations")?;
    }

    let redis = RedisClient::new(config.cache.clone())
        .await
        .context("failed to connect to redis")?;

    let token_service = Arc::new(TokenService::new(
        PgTokenRepository::new(db.get_pool().clone()),
        Arc::new(RedisTokenCache::new(redis.clone())),
        TokenServiceConfig::from(&config.jwt),
    ));
    let merchant_service = Arc::new(MerchantService::new(
        PgMerchantRepository::new(db.get_pool().clone()),
        RedisMerchantCache::new(redis, config.cache.merchant_set_key.clone()),
    ));

    let synced = merchant_service
        .sync_active_codes()
        .await
        .context("failed to load active merchant codes")?;
    info!(count = synced, "Active merchant codes loaded");

    let app_state = web::Data::new(AppState::new(
        token_service,
        merchant_service,
        &config.server,
    ));

    let mut server = HttpServer::new(move || {
        create_app(app_state.clone()).wrap(TracingLogger::default())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(config.server.bind_address())
        .with_context(|| format!("failed to bind {}", config.server.bind_address()))?
        .run()
        .await?;

    db.close().await;
    info!("Server stopped");
    Ok(())
}
