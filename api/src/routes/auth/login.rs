use actix_web::{web, HttpResponse};
use validator::Validate;

use wg_core::repositories::{TokenRepository, UserRepository};

use crate::dto::{AuthenticationResponse, LoginRequest};
use crate::handlers::{handle_domain_error, validation_error_response};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Every token previously issued to the user is revoked once the new
/// access token is recorded.
///
/// ## Errors
/// - 400 Bad Request: Missing or malformed fields
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login<U, T>(
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    let request = request.into_inner().trimmed();
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state
        .auth_service
        .authenticate(&request.email, &request.password)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(AuthenticationResponse::from(response)),
        Err(e) => handle_domain_error(e),
    }
}
