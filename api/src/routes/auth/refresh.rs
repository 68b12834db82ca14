use actix_web::http::{header::AUTHORIZATION, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse};

use wg_core::domain::value_objects::RefreshOutcome;
use wg_core::repositories::{TokenRepository, UserRepository};
use wg_shared::errors::error_codes;

use crate::dto::{AuthenticationResponse, ErrorResponse, ErrorResponseExt};
use crate::handlers::handle_domain_error;

use super::AppState;

/// Handler for POST /api/v1/auth/refresh-token
///
/// Reads the refresh token from `Authorization: Bearer {refresh_token}`.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "accessToken": "eyJ...", "refreshToken": "<the presented refresh token>" }
/// ```
///
/// A missing bearer header or an expired refresh token is answered with an
/// empty 200, or 401 when strict refresh is enabled.
///
/// ## Errors
/// - 401 Unauthorized: Malformed or badly signed token
/// - 404 Not Found: Token subject is not a registered user
pub async fn refresh_token<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    match state.auth_service.refresh(authorization).await {
        Ok(RefreshOutcome::Issued(response)) => {
            HttpResponse::Ok().json(AuthenticationResponse::from(response))
        }
        Ok(RefreshOutcome::Ignored(reason)) => {
            tracing::debug!(reason = reason.as_str(), "Refresh request ignored");
            if state.strict_refresh {
                ErrorResponse::new(error_codes::INVALID_TOKEN, "Refresh token rejected")
                    .add_detail("reason", reason.as_str())
                    .to_response(StatusCode::UNAUTHORIZED)
            } else {
                HttpResponse::Ok().finish()
            }
        }
        Err(e) => handle_domain_error(e),
    }
}
