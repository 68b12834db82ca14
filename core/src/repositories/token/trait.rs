//! Token repository trait defining the interface for access token persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::Token;
use crate::errors::DomainError;

/// Repository trait for issued access token records
///
/// Every access token handed to a client is recorded here together with its
/// `expired`/`revoked` flags. Records are never deleted; superseded tokens are
/// flipped to expired and revoked so the history stays auditable.
///
/// # Example
/// ```no_run
/// # use uuid::Uuid;
/// # use wg_core::repositories::TokenRepository;
/// # async fn example(
/// #     repo: &impl TokenRepository,
/// #     user_id: Uuid,
/// # ) -> Result<(), Box<dyn std::error::Error>> {
/// let revoked = repo.rotate(user_id, "eyJhbGciOi...").await?;
/// println!("Superseded {} tokens", revoked);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new token record
    ///
    /// # Returns
    /// * `Ok(Token)` - The saved record
    /// * `Err(DomainError)` - Save failed (e.g., duplicate token string)
    async fn save(&self, token: Token) -> Result<Token, DomainError>;

    /// Find every token of a user with `expired = false` and `revoked = false`
    ///
    /// No ordering is guaranteed.
    async fn find_all_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Token>, DomainError>;

    /// Mark every given record expired and revoked
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records updated
    async fn revoke_all(&self, tokens: Vec<Token>) -> Result<usize, DomainError>;

    /// Find a record by its raw token string
    ///
    /// # Returns
    /// * `Ok(Some(Token))` - Record found
    /// * `Ok(None)` - The token was never issued by this gateway
    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError>;

    /// Revoke every valid token of `user_id` and record `token` as its sole valid token
    ///
    /// Implementations backed by a shared store should override this so the
    /// revoke and the insert happen as one atomic unit. The default composes
    /// the primitives above and relies on the caller for mutual exclusion.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of previously valid tokens that were revoked
    async fn rotate(&self, user_id: Uuid, token: &str) -> Result<usize, DomainError> {
        let valid = self.find_all_valid_by_user(user_id).await?;
        let revoked = if valid.is_empty() {
            0
        } else {
            self.revoke_all(valid).await?
        };
        self.save(Token::bearer(user_id, token)).await?;
        Ok(revoked)
    }

    /// Check if a token was issued here and is still valid
    async fn is_token_valid(&self, token: &str) -> Result<bool, DomainError> {
        match self.find_by_token(token).await? {
            Some(record) => Ok(record.is_valid()),
            None => Ok(false),
        }
    }
}
