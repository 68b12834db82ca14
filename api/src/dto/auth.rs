use serde::{Deserialize, Serialize};
use validator::Validate;

use wg_core::domain::entities::user::Role;
use wg_core::domain::value_objects::{AuthResponse, Registration};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 100, message = "firstname is required"))]
    pub firstname: String,

    #[validate(length(min = 1, max = 100, message = "lastname is required"))]
    pub lastname: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    /// "USER" or "ADMIN", defaults to "USER"
    #[serde(default)]
    pub role: Role,
}

impl SignupRequest {
    /// Strips surrounding whitespace from the email before validation
    pub fn trimmed(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

impl From<SignupRequest> for Registration {
    fn from(request: SignupRequest) -> Self {
        Registration::new(
            request.firstname,
            request.lastname,
            request.email,
            request.password,
            request.role,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// Strips surrounding whitespace from the email before validation
    pub fn trimmed(mut self) -> Self {
        self.email = self.email.trim().to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<AuthResponse> for AuthenticationResponse {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            firstname: "Alice".to_string(),
            lastname: "Liddell".to_string(),
            email: "alice@example.com".to_string(),
            password: "wonderland".to_string(),
            role: Role::User,
        };
        assert!(valid.validate().is_ok());

        let invalid = SignupRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_signup_role_defaults_to_user() {
        let request: SignupRequest = serde_json::from_str(
            r#"{"firstname":"A","lastname":"B","email":"a@example.com","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::User);

        let request: SignupRequest = serde_json::from_str(
            r#"{"firstname":"A","lastname":"B","email":"a@example.com","password":"pw","role":"ADMIN"}"#,
        )
        .unwrap();
        assert_eq!(request.role, Role::Admin);
    }

    #[test]
    fn test_login_request_trims_email_before_validation() {
        let request = LoginRequest {
            email: "  ada@example.com\t".to_string(),
            password: "pw".to_string(),
        };
        assert!(request.validate().is_err());

        let request = request.trimmed();
        assert_eq!(request.email, "ada@example.com");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_authentication_response_uses_camel_case() {
        let body = serde_json::to_value(AuthenticationResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({"accessToken": "a", "refreshToken": "r"}));
    }
}
