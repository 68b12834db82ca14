//! Liveness endpoint

use actix_web::{web, HttpResponse};
use serde::Serialize;

use wg_core::repositories::{TokenRepository, UserRepository};

use crate::routes::auth::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    database: &'static str,
    timestamp: String,
}

/// Handler for GET /health
///
/// Answers 503 when a configured database does not respond.
pub async fn health_check<U, T>(state: web::Data<AppState<U, T>>) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let database = match &state.database {
        None => "not_configured",
        Some(pool) => match pool.health_check().await {
            Ok(true) => "up",
            Ok(false) | Err(_) => "down",
        },
    };

    let body = HealthResponse {
        status: if database == "down" { "degraded" } else { "healthy" },
        service: "wishlist-gateway",
        version: env!("CARGO_PKG_VERSION"),
        database,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    if database == "down" {
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}
