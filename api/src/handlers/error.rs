use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use validator::ValidationErrors;

use wg_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use wg_shared::errors::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    let (status, code, message) = match &error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::UserAlreadyExists => (
                StatusCode::CONFLICT,
                error_codes::USER_ALREADY_EXISTS,
                "A user with this email already exists".to_string(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_CREDENTIALS,
                "Invalid email or password".to_string(),
            ),
            AuthError::UserNotFound => (
                StatusCode::NOT_FOUND,
                error_codes::USER_NOT_FOUND,
                "User not found".to_string(),
            ),
            AuthError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                error_codes::UNAUTHORIZED,
                "Authentication required".to_string(),
            ),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                error_codes::INVALID_TOKEN,
                "Invalid token".to_string(),
            ),
            TokenError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_EXPIRED,
                "Token has expired".to_string(),
            ),
            TokenError::TokenRevoked => (
                StatusCode::UNAUTHORIZED,
                error_codes::TOKEN_REVOKED,
                "Token has been revoked".to_string(),
            ),
            TokenError::TokenGenerationFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_codes::INTERNAL_ERROR,
                "An internal error occurred".to_string(),
            ),
        },
        DomainError::ValidationErr(validation_error) => match validation_error {
            ValidationError::InvalidEmail { email } => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                format!("Invalid email: {}", email),
            ),
            ValidationError::RequiredField { field } => (
                StatusCode::BAD_REQUEST,
                error_codes::VALIDATION_ERROR,
                format!("{} is required", field),
            ),
        },
        DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    };

    if status.is_server_error() {
        tracing::error!(error = %error, "Request failed");
    } else {
        tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
    }

    ErrorResponse::new(code, message).to_response(status)
}

/// 400 response listing the failed fields
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let mut response =
        ErrorResponse::new(error_codes::VALIDATION_ERROR, "Request validation failed");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    response.to_response(StatusCode::BAD_REQUEST)
}

/// Render malformed JSON bodies as a 400 `ErrorResponse`
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = err.to_string();
    let response = ErrorResponse::new(error_codes::VALIDATION_ERROR, message)
        .to_response(StatusCode::BAD_REQUEST);
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (AuthError::UserAlreadyExists.into(), StatusCode::CONFLICT),
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::UserNotFound.into(), StatusCode::NOT_FOUND),
            (AuthError::Unauthorized.into(), StatusCode::UNAUTHORIZED),
            (TokenError::InvalidToken.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenExpired.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenRevoked.into(), StatusCode::UNAUTHORIZED),
            (TokenError::TokenGenerationFailed.into(), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ValidationError::RequiredField {
                    field: "email".to_string(),
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(handle_domain_error(error).status(), expected);
        }
    }
}
