//! Password hashing and credential verification capabilities

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::entities::user::mask_email;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::UserRepository;

/// One-way password hashing
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, password: &str) -> DomainResult<String>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> DomainResult<bool>;
}

/// bcrypt-backed password hasher
#[derive(Debug, Clone)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptPasswordHasher {
    fn hash(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> DomainResult<bool> {
        bcrypt::verify(password, hash)
            .map_err(|e| DomainError::internal(format!("Failed to verify password: {}", e)))
    }
}

/// Verifies an email/password pair
#[async_trait]
pub trait CredentialMatcher: Send + Sync {
    /// # Returns
    /// * `Ok(())` - Credentials match a registered user
    /// * `Err(AuthError::InvalidCredentials)` - Unknown email or wrong password
    async fn verify(&self, email: &str, password: &str) -> DomainResult<()>;
}

/// Credential matcher that checks the password against the stored user hash
pub struct RepositoryCredentialMatcher<U: UserRepository> {
    user_repository: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U: UserRepository> RepositoryCredentialMatcher<U> {
    pub fn new(user_repository: Arc<U>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            user_repository,
            hasher,
        }
    }
}

#[async_trait]
impl<U: UserRepository> CredentialMatcher for RepositoryCredentialMatcher<U> {
    async fn verify(&self, email: &str, password: &str) -> DomainResult<()> {
        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!(email = %mask_email(email), "Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = user.password_hash;
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                DomainError::internal(format!("Password verification task failed: {}", e))
            })??;

        if matches {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
