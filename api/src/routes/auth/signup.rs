use actix_web::{web, HttpResponse};
use validator::Validate;

use wg_core::repositories::{TokenRepository, UserRepository};

use crate::dto::{AuthenticationResponse, SignupRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::AppState;

/// Handler for POST /api/v1/auth/signup
///
/// # Request Body
///
/// ```json
/// {
///     "firstname": "Ada",
///     "lastname": "Lovelace",
///     "email": "ada@example.com",
///     "password": "secret",
///     "role": "USER"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "accessToken": "eyJ...", "refreshToken": "eyJ..." }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Missing or malformed fields
/// - 409 Conflict: Email already registered
pub async fn signup<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<SignupRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let request = request.into_inner().trimmed();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.auth_service.register(request.into()).await {
        Ok(response) => HttpResponse::Ok().json(AuthenticationResponse::from(response)),
        Err(e) => handle_domain_error(e),
    }
}
