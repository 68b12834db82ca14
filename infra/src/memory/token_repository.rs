//! In-memory implementation of the TokenRepository trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use wg_core::domain::entities::token::Token;
use wg_core::errors::DomainError;
use wg_core::repositories::TokenRepository;

/// In-memory token store keyed by the raw token string
///
/// `rotate` holds the write lock for the whole revoke-and-insert, so it is
/// atomic with respect to every other call on the same repository.
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    tokens: Arc<RwLock<HashMap<String, Token>>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record of `user_id`, valid or not
    pub async fn tokens_for(&self, user_id: Uuid) -> Vec<Token> {
        let tokens = self.tokens.read().await;
        tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Total number of stored records
    pub async fn count(&self) -> usize {
        self.tokens.read().await.len()
    }
}

fn insert(tokens: &mut HashMap<String, Token>, token: Token) -> Result<Token, DomainError> {
    if tokens.contains_key(&token.token) {
        return Err(DomainError::internal("Token already recorded"));
    }
    tokens.insert(token.token.clone(), token.clone());
    Ok(token)
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save(&self, token: Token) -> Result<Token, DomainError> {
        let mut tokens = self.tokens.write().await;
        insert(&mut tokens, token)
    }

    async fn find_all_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .values()
            .filter(|t| t.user_id == user_id && t.is_valid())
            .cloned()
            .collect())
    }

    async fn revoke_all(&self, revoked: Vec<Token>) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in revoked {
            if let Some(stored) = tokens.get_mut(&token.token) {
                stored.revoke();
                count += 1;
            }
        }

        Ok(count)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn rotate(&self, user_id: Uuid, token: &str) -> Result<usize, DomainError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(token) {
            return Err(DomainError::internal("Token already recorded"));
        }

        let mut revoked = 0;
        for stored in tokens.values_mut() {
            if stored.user_id == user_id && stored.is_valid() {
                stored.revoke();
                revoked += 1;
            }
        }

        insert(&mut tokens, Token::bearer(user_id, token))?;
        Ok(revoked)
    }
}
