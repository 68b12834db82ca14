//! Main authentication service implementation

use std::sync::Arc;

use crate::domain::entities::token::Token;
use crate::domain::entities::user::{mask_email, normalize_email, User};
use crate::domain::value_objects::{AuthResponse, RefreshIgnored, RefreshOutcome, Registration};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError, ValidationError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::credentials::{
    BcryptPasswordHasher, CredentialMatcher, PasswordHasher, RepositoryCredentialMatcher,
};
use super::locks::UserLocks;

/// Scheme prefix expected on the refresh endpoint's `Authorization` header
pub const BEARER_PREFIX: &str = "Bearer ";

/// Session coordinator: registration, login, refresh and logout
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Store of issued access tokens
    token_repository: Arc<T>,
    /// Token codec
    token_service: Arc<TokenService>,
    /// Password hashing for new accounts
    password_hasher: Arc<dyn PasswordHasher>,
    /// Email/password verification for logins
    credential_matcher: Arc<dyn CredentialMatcher>,
    /// Serializes token rotation per user
    locks: UserLocks,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository + 'static,
    T: TokenRepository,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Repository for user data persistence
    /// * `token_repository` - Store of issued access tokens
    /// * `token_service` - Service for JWT signing and decoding
    /// * `password_hasher` - Hasher applied to passwords at registration
    /// * `credential_matcher` - Verifier used at login
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        token_service: Arc<TokenService>,
        password_hasher: Arc<dyn PasswordHasher>,
        credential_matcher: Arc<dyn CredentialMatcher>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            token_service,
            password_hasher,
            credential_matcher,
            locks: UserLocks::new(),
        }
    }

    /// Create a service that hashes with bcrypt and checks logins against the user repository
    pub fn with_bcrypt(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        token_service: Arc<TokenService>,
        config: AuthServiceConfig,
    ) -> Self {
        let hasher: Arc<dyn PasswordHasher> =
            Arc::new(BcryptPasswordHasher::new(config.password_hash_cost));
        let matcher = Arc::new(RepositoryCredentialMatcher::new(
            Arc::clone(&user_repository),
            Arc::clone(&hasher),
        ));

        Self::new(user_repository, token_repository, token_service, hasher, matcher)
    }

    /// Register a new user and issue its first token pair
    ///
    /// The access token is recorded in the token store; the refresh token is
    /// only returned to the caller.
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Fresh access and refresh tokens
    /// * `Err(AuthError::UserAlreadyExists)` - Email already registered
    /// * `Err(ValidationError)` - Missing email or password
    pub async fn register(&self, registration: Registration) -> DomainResult<AuthResponse> {
        let Registration {
            firstname,
            lastname,
            email,
            password,
            role,
        } = registration;

        // Step 1: Validate input
        let email = normalize_email(&email);
        validate_email(&email)?;
        if password.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "password".to_string(),
            }
            .into());
        }

        // Step 2: Hash the password off the async workers
        let password_hash = self.hash_password(password).await?;

        // Step 3: Persist the user
        let user = User::new(firstname, lastname, &email, password_hash, role);
        let user = self.user_repository.create(user).await?;

        // Step 4: Mint and record tokens
        let access_token = self.token_service.generate_access_token(&user)?;
        let refresh_token = self.token_service.generate_refresh_token(&user)?;
        self.token_repository
            .save(Token::bearer(user.id, access_token.clone()))
            .await?;

        tracing::info!(
            user_id = %user.id,
            email = %mask_email(&user.email),
            role = %user.role,
            "User registered"
        );

        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Log a user in, superseding every access token it held before
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Fresh access and refresh tokens
    /// * `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    pub async fn authenticate(&self, email: &str, password: &str) -> DomainResult<AuthResponse> {
        let email = normalize_email(email);

        // Step 1: Verify credentials
        if let Err(e) = self.credential_matcher.verify(&email, password).await {
            if matches!(e, DomainError::Auth(AuthError::InvalidCredentials)) {
                tracing::warn!(email = %mask_email(&email), "Login rejected");
            }
            return Err(e);
        }

        // Step 2: Load the user the matcher just accepted
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                DomainError::internal(format!(
                    "User {} vanished after credential check",
                    mask_email(&email)
                ))
            })?;

        // Step 3: Mint tokens
        let access_token = self.token_service.generate_access_token(&user)?;
        let refresh_token = self.token_service.generate_refresh_token(&user)?;

        // Step 4: Revoke prior tokens and record the new one
        let revoked = self.rotate(&user, &access_token).await?;

        tracing::info!(
            user_id = %user.id,
            revoked_tokens = revoked,
            "User authenticated"
        );

        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Mint a new access token from the refresh token in an `Authorization` header
    ///
    /// # Arguments
    ///
    /// * `authorization` - Raw header value, `None` when absent
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshOutcome::Issued)` - New access token plus the presented refresh token
    /// * `Ok(RefreshOutcome::Ignored)` - No bearer header, or the token is expired or
    ///   not owned by its subject; nothing was written
    /// * `Err(TokenError::InvalidToken)` - Malformed or badly signed token
    /// * `Err(AuthError::UserNotFound)` - Subject does not resolve to a user
    pub async fn refresh(&self, authorization: Option<&str>) -> DomainResult<RefreshOutcome> {
        // Step 1: Require a bearer header
        let Some(refresh_token) = authorization.and_then(|h| h.strip_prefix(BEARER_PREFIX)) else {
            tracing::debug!("Refresh request without bearer token");
            return Ok(RefreshOutcome::Ignored(RefreshIgnored::MissingBearer));
        };

        // Step 2: Resolve the subject
        let email = self.token_service.extract_subject(refresh_token)?;
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // Step 3: Check ownership and expiry
        if !self.token_service.is_valid(refresh_token, &user) {
            tracing::debug!(user_id = %user.id, "Refresh token no longer valid");
            return Ok(RefreshOutcome::Ignored(RefreshIgnored::InvalidRefreshToken));
        }

        // Step 4: Mint and rotate
        let access_token = self.token_service.generate_access_token(&user)?;
        let revoked = self.rotate(&user, &access_token).await?;

        tracing::info!(
            user_id = %user.id,
            revoked_tokens = revoked,
            "Access token refreshed"
        );

        Ok(RefreshOutcome::Issued(AuthResponse::new(
            access_token,
            refresh_token.to_string(),
        )))
    }

    /// Revoke the stored record of an access token
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Record is now expired and revoked
    /// * `Err(TokenError::InvalidToken)` - Token was never issued here
    pub async fn logout(&self, access_token: &str) -> DomainResult<()> {
        let record = self
            .token_repository
            .find_by_token(access_token)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        let user_id = record.user_id;
        let _guard = self.locks.acquire(user_id).await;
        self.token_repository.revoke_all(vec![record]).await?;

        tracing::info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolve the user behind an access token presented to a guarded route
    ///
    /// The token must verify (signature, expiry, access use), its subject must
    /// exist, and its stored record must be neither expired nor revoked.
    pub async fn validate_access_token(&self, access_token: &str) -> DomainResult<User> {
        let claims = self.token_service.verify_access_token(access_token)?;

        let user = self
            .user_repository
            .find_by_email(&claims.sub)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let record = self
            .token_repository
            .find_by_token(access_token)
            .await?
            .ok_or(TokenError::InvalidToken)?;

        if record.user_id != user.id {
            return Err(TokenError::InvalidToken.into());
        }
        if !record.is_valid() {
            return Err(TokenError::TokenRevoked.into());
        }

        Ok(user)
    }

    async fn rotate(&self, user: &User, access_token: &str) -> DomainResult<usize> {
        let _guard = self.locks.acquire(user.id).await;
        self.token_repository.rotate(user.id, access_token).await
    }

    async fn hash_password(&self, password: String) -> DomainResult<String> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }
}

fn validate_email(email: &str) -> DomainResult<()> {
    if email.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "email".to_string(),
        }
        .into());
    }

    if validator::validate_email(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
        }
        .into())
    }
}
