//! Configuration for the token service

use jsonwebtoken::Algorithm;
use wg_shared::config::JwtConfig;

use crate::errors::{DomainError, DomainResult};

/// Configuration for the token service
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// JWT signing algorithm, HMAC family only
    pub algorithm: Algorithm,
    /// Access token expiry in seconds
    pub access_token_expiry_seconds: i64,
    /// Refresh token expiry in seconds
    pub refresh_token_expiry_seconds: i64,
    /// Value of the `iss` claim
    pub issuer: String,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "development-secret-please-change-in-production".to_string(),
            algorithm: Algorithm::HS256,
            access_token_expiry_seconds: 900,
            refresh_token_expiry_seconds: 604800,
            issuer: "wishlist-gateway".to_string(),
        }
    }
}

impl TokenServiceConfig {
    /// Build the codec configuration from the application's JWT settings
    ///
    /// Rejects algorithms outside HS256/HS384/HS512 and non-positive lifetimes.
    pub fn from_jwt_config(jwt: &JwtConfig) -> DomainResult<Self> {
        let algorithm = parse_hmac_algorithm(&jwt.algorithm)?;

        if jwt.secret.is_empty() {
            return Err(DomainError::internal("JWT secret must not be empty"));
        }
        if jwt.access_token_expiry <= 0 || jwt.refresh_token_expiry <= 0 {
            return Err(DomainError::internal("JWT token lifetimes must be positive"));
        }

        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            algorithm,
            access_token_expiry_seconds: jwt.access_token_expiry,
            refresh_token_expiry_seconds: jwt.refresh_token_expiry,
            issuer: jwt.issuer.clone(),
        })
    }
}

fn parse_hmac_algorithm(name: &str) -> DomainResult<Algorithm> {
    match name.trim().to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(DomainError::internal(format!(
            "Unsupported JWT algorithm: {} (expected HS256, HS384 or HS512)",
            other
        ))),
    }
}
