//! Main token service implementation

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::token::{Claims, TokenUse};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, DomainResult, TokenError};

use super::config::TokenServiceConfig;

/// Signs and decodes the gateway's JWTs
///
/// Two validation profiles are kept: `validation` enforces expiry and is
/// used for guarding requests, `subject_validation` only checks signature,
/// structure and issuer so that an expired but authentic token still
/// yields its subject.
pub struct TokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    subject_validation: Validation,
}

impl TokenService {
    /// Creates a new token service instance
    ///
    /// # Returns
    ///
    /// A new `TokenService` instance, or an error if the algorithm is not HMAC
    pub fn new(config: TokenServiceConfig) -> DomainResult<Self> {
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(DomainError::internal(format!(
                "Unsupported JWT algorithm: {:?}",
                config.algorithm
            )));
        }

        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.validate_aud = false;
        validation.validate_exp = true;
        validation.leeway = 0;

        let mut subject_validation = validation.clone();
        subject_validation.validate_exp = false;

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            validation,
            subject_validation,
        })
    }

    /// Mints a short-lived access token for `user`
    pub fn generate_access_token(&self, user: &User) -> DomainResult<String> {
        let claims = Claims::new(
            &user.email,
            &self.config.issuer,
            TokenUse::Access,
            Duration::seconds(self.config.access_token_expiry_seconds),
        );
        self.encode_jwt(&claims)
    }

    /// Mints a long-lived refresh token for `user`
    pub fn generate_refresh_token(&self, user: &User) -> DomainResult<String> {
        let claims = Claims::new(
            &user.email,
            &self.config.issuer,
            TokenUse::Refresh,
            Duration::seconds(self.config.refresh_token_expiry_seconds),
        );
        self.encode_jwt(&claims)
    }

    /// Returns the subject (user email) of an authentic token
    ///
    /// Expiry is not enforced here.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The `sub` claim
    /// * `Err(TokenError::InvalidToken)` - Malformed, badly signed or foreign issuer
    pub fn extract_subject(&self, token: &str) -> DomainResult<String> {
        decode::<Claims>(token, &self.decoding_key, &self.subject_validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected token while extracting subject");
                DomainError::Token(TokenError::InvalidToken)
            })
    }

    /// True iff the token names `user` as its subject and has not expired
    pub fn is_valid(&self, token: &str, user: &User) -> bool {
        match decode::<Claims>(token, &self.decoding_key, &self.subject_validation) {
            Ok(data) => data.claims.sub == user.email && !data.claims.is_expired(),
            Err(_) => false,
        }
    }

    /// Verifies an access token and returns the claims
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - The decoded claims if valid
    /// * `Err(TokenError::TokenExpired)` - Signature fine, expiry passed
    /// * `Err(TokenError::InvalidToken)` - Anything else, including refresh tokens
    pub fn verify_access_token(&self, token: &str) -> DomainResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                if e.kind() == &ErrorKind::ExpiredSignature {
                    DomainError::Token(TokenError::TokenExpired)
                } else {
                    DomainError::Token(TokenError::InvalidToken)
                }
            })?;

        if token_data.claims.token_use != TokenUse::Access {
            return Err(DomainError::Token(TokenError::InvalidToken));
        }

        Ok(token_data.claims)
    }

    /// Access token lifetime in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.config.access_token_expiry_seconds
    }

    /// Encodes claims into a JWT
    fn encode_jwt(&self, claims: &Claims) -> DomainResult<String> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }
}
