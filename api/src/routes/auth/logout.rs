use actix_web::{web, HttpResponse};

use wg_core::repositories::{TokenRepository, UserRepository};

use crate::dto::LogoutResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Requires `Authorization: Bearer {access_token}`; the presented access
/// token is revoked so the guard rejects it afterwards.
pub async fn logout<U, T>(state: web::Data<AppState<U, T>>, auth: AuthContext) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    match state.auth_service.logout(&auth.token).await {
        Ok(()) => {
            tracing::info!(user_id = %auth.user_id, "User logged out");
            HttpResponse::Ok().json(LogoutResponse {
                message: "Logged out successfully".to_string(),
            })
        }
        Err(e) => handle_domain_error(e),
    }
}
