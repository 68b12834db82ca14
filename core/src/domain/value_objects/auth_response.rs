//! Authentication response value object for API responses.

use serde::{Deserialize, Serialize};

/// Token pair handed back after signup, login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// JWT refresh token for obtaining new access tokens
    pub refresh_token: String,
}

impl AuthResponse {
    /// Creates a new authentication response
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
        }
    }
}
