//! JWT authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the bearer access token from the Authorization
//! header, resolves it through an `AccessTokenValidator` registered as app
//! data, and injects an `AuthContext` into the request.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::{header::AUTHORIZATION, StatusCode},
    web, Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use wg_core::{
    domain::entities::user::{Role, User},
    errors::DomainError,
    repositories::{TokenRepository, UserRepository},
    services::auth::{AuthService, BEARER_PREFIX},
};
use wg_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::handlers::handle_domain_error;

/// User authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user's id
    pub user_id: Uuid,
    /// Authenticated user's email
    pub email: String,
    /// Authenticated user's role
    pub role: Role,
    /// The access token the request was authorized with
    pub token: String,
}

impl AuthContext {
    pub fn new(user: &User, token: String) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            token,
        }
    }
}

/// Resolves an access token to the user it authorizes
#[async_trait]
pub trait AccessTokenValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<User, DomainError>;
}

#[async_trait]
impl<U, T> AccessTokenValidator for AuthService<U, T>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    async fn validate(&self, token: &str) -> Result<User, DomainError> {
        self.validate_access_token(token).await
    }
}

/// JWT authentication middleware factory
///
/// Requires `web::Data<dyn AccessTokenValidator>` in the app data.
#[derive(Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(token) = extract_bearer_token(&req) else {
                let response = unauthorized("Missing or invalid Authorization header");
                return Ok(req.into_response(response).map_into_right_body());
            };

            let Some(validator) = req.app_data::<web::Data<dyn AccessTokenValidator>>().cloned()
            else {
                tracing::error!("JwtAuth is mounted without an AccessTokenValidator");
                let response = unauthorized("Authentication is not configured");
                return Ok(req.into_response(response).map_into_right_body());
            };

            let user = match validator.validate(&token).await {
                Ok(user) => user,
                Err(e) => {
                    tracing::debug!(error = %e, "Access token rejected");
                    return Ok(req
                        .into_response(handle_domain_error(e))
                        .map_into_right_body());
                }
            };

            req.extensions_mut().insert(AuthContext::new(&user, token));

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
pub fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

fn unauthorized(message: &str) -> HttpResponse {
    ErrorResponse::new(error_codes::UNAUTHORIZED, message).to_response(StatusCode::UNAUTHORIZED)
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
