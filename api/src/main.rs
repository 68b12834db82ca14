use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;

use wg_api::app::create_app;
use wg_api::routes::auth::AppState;
use wg_api::telemetry::init_tracing;
use wg_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use wg_infra::database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use wg_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;

    tracing::info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting wishlist gateway"
    );
    for warning in config.security_warnings() {
        tracing::warn!("{}", warning);
    }

    let database = DatabasePool::new(config.database.clone())
        .await
        .context("Failed to connect to the database")?;
    if config.database.run_migrations {
        database
            .run_migrations()
            .await
            .context("Failed to run database migrations")?;
    }

    let user_repository = Arc::new(MySqlUserRepository::new(database.pool().clone()));
    let token_repository = Arc::new(MySqlTokenRepository::new(database.pool().clone()));

    let token_service = Arc::new(TokenService::new(TokenServiceConfig::from_jwt_config(
        &config.auth.jwt,
    )?)?);
    let auth_service = Arc::new(AuthService::with_bcrypt(
        user_repository,
        token_repository,
        token_service,
        AuthServiceConfig::from(&config.auth),
    ));

    let app_state = web::Data::new(
        AppState::new(auth_service)
            .with_strict_refresh(config.auth.strict_refresh)
            .with_database(database.clone()),
    );

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, workers = config.server.workers, "Binding HTTP server");

    let cors = config.cors.clone();
    let max_payload_size = config.server.max_payload_size;
    let mut server =
        HttpServer::new(move || create_app(app_state.clone(), &cors, max_payload_size));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    database.close().await;
    tracing::info!("Wishlist gateway stopped");
    Ok(())
}
