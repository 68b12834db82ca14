#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test::TestRequest, web};
use serde_json::json;

use wg_api::app::DEFAULT_MAX_PAYLOAD_SIZE;
use wg_api::routes::auth::AppState;
use wg_core::services::{AuthService, AuthServiceConfig, TokenService, TokenServiceConfig};
use wg_infra::memory::{InMemoryTokenRepository, InMemoryUserRepository};
use wg_shared::config::CorsConfig;

pub type TestState = AppState<InMemoryUserRepository, InMemoryTokenRepository>;

pub const PASSWORD: &str = "correct horse battery staple";

pub fn test_state(strict_refresh: bool) -> web::Data<TestState> {
    let token_service = Arc::new(
        TokenService::new(TokenServiceConfig {
            jwt_secret: "integration-test-secret".to_string(),
            ..Default::default()
        })
        .expect("valid token config"),
    );
    let auth_service = Arc::new(AuthService::with_bcrypt(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTokenRepository::new()),
        token_service,
        AuthServiceConfig {
            password_hash_cost: 4,
        },
    ));

    web::Data::new(AppState::new(auth_service).with_strict_refresh(strict_refresh))
}

pub fn cors() -> CorsConfig {
    CorsConfig::development()
}

pub fn max_payload() -> usize {
    DEFAULT_MAX_PAYLOAD_SIZE
}

pub fn signup_request(email: &str) -> TestRequest {
    TestRequest::post().uri("/api/v1/auth/signup").set_json(json!({
        "firstname": "Ada",
        "lastname": "Lovelace",
        "email": email,
        "password": PASSWORD,
    }))
}

pub fn login_request(email: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": email, "password": password }))
}

pub fn refresh_request(refresh_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/refresh-token")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", refresh_token)))
}

pub fn logout_request(access_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access_token)))
}
