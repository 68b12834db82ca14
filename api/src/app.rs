//! Application factory
//!
//! Builds the Actix-web application around an `AppState` so the binary and
//! the integration tests serve the exact same routes.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    web, App, Error, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use wg_core::repositories::{TokenRepository, UserRepository};
use wg_shared::config::CorsConfig;
use wg_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::json_error_handler;
use crate::middleware::{auth::AccessTokenValidator, cors::create_cors, JwtAuth};
use crate::routes::auth::{
    login::login, logout::logout, refresh::refresh_token, signup::signup, AppState,
};
use crate::routes::health::health_check;

/// Default JSON body limit when none is configured
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 64 * 1024;

/// Create and configure the application with all dependencies
pub fn create_app<U, T>(
    app_state: web::Data<AppState<U, T>>,
    cors: &CorsConfig,
    max_payload_size: usize,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let validator: Arc<dyn AccessTokenValidator> = app_state.auth_service.clone();

    App::new()
        .app_data(app_state)
        .app_data(web::Data::from(validator))
        .app_data(
            web::JsonConfig::default()
                .limit(max_payload_size)
                .error_handler(json_error_handler),
        )
        .wrap(create_cors(cors))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<U, T>))
        .service(
            web::scope("/api/v1/auth")
                .route("/signup", web::post().to(signup::<U, T>))
                .route("/login", web::post().to(login::<U, T>))
                .route("/refresh-token", web::post().to(refresh_token::<U, T>))
                .service(
                    web::resource("/logout")
                        .wrap(JwtAuth::new())
                        .route(web::post().to(logout::<U, T>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, "The requested resource was not found")
        .to_response(StatusCode::NOT_FOUND)
}
