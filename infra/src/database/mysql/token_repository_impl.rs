//! MySQL implementation of the TokenRepository trait.
//!
//! Stores every issued access token in the `tokens` table. Rotation runs in
//! a transaction that first locks the owning `users` row, so concurrent
//! logins for the same user are serialized across gateway instances.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder, Row};
use uuid::Uuid;

use wg_core::domain::entities::token::{Token, TokenType};
use wg_core::errors::DomainError;
use wg_core::repositories::TokenRepository;

use crate::database::db_error;

const TOKEN_COLUMNS: &str = "id, user_id, token, token_type, expired, revoked, created_at";

const INSERT_TOKEN: &str = r#"
    INSERT INTO tokens (
        id, user_id, token, token_type, expired, revoked, created_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to Token entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<Token, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| db_error("Failed to get id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| db_error("Failed to get user_id", e))?;
        let token_type: String = row
            .try_get("token_type")
            .map_err(|e| db_error("Failed to get token_type", e))?;

        Ok(Token {
            id: Uuid::parse_str(&id)
                .map_err(|e| DomainError::internal(format!("Invalid token UUID: {}", e)))?,
            user_id: Uuid::parse_str(&user_id)
                .map_err(|e| DomainError::internal(format!("Invalid user UUID: {}", e)))?,
            token: row
                .try_get("token")
                .map_err(|e| db_error("Failed to get token", e))?,
            token_type: token_type
                .parse::<TokenType>()
                .map_err(DomainError::internal)?,
            expired: row
                .try_get("expired")
                .map_err(|e| db_error("Failed to get expired", e))?,
            revoked: row
                .try_get("revoked")
                .map_err(|e| db_error("Failed to get revoked", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| db_error("Failed to get created_at", e))?,
        })
    }

    fn bind_insert(
        token: &Token,
    ) -> sqlx::query::Query<'static, MySql, sqlx::mysql::MySqlArguments> {
        sqlx::query(INSERT_TOKEN)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(token.token.clone())
            .bind(token.token_type.as_str())
            .bind(token.expired)
            .bind(token.revoked)
            .bind(token.created_at)
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, token: Token) -> Result<Token, DomainError> {
        Self::bind_insert(&token)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to save token", e))?;

        Ok(token)
    }

    async fn find_all_valid_by_user(&self, user_id: Uuid) -> Result<Vec<Token>, DomainError> {
        let query = format!(
            "SELECT {} FROM tokens WHERE user_id = ? AND expired = FALSE AND revoked = FALSE",
            TOKEN_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find valid tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn revoke_all(&self, tokens: Vec<Token>) -> Result<usize, DomainError> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new("UPDATE tokens SET expired = TRUE, revoked = TRUE WHERE id IN (");
        let mut ids = builder.separated(", ");
        for token in &tokens {
            ids.push_bind(token.id.to_string());
        }
        ids.push_unseparated(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to revoke tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError> {
        let query = format!("SELECT {} FROM tokens WHERE token = ? LIMIT 1", TOKEN_COLUMNS);

        let row = sqlx::query(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to find token", e))?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn rotate(&self, user_id: Uuid, token: &str) -> Result<usize, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin rotation", e))?;

        // Serializes rotations of the same user until commit
        sqlx::query("SELECT id FROM users WHERE id = ? FOR UPDATE")
            .bind(user_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to lock user", e))?
            .ok_or_else(|| {
                DomainError::internal(format!("Cannot rotate tokens of unknown user {}", user_id))
            })?;

        let revoked = sqlx::query(
            "UPDATE tokens SET expired = TRUE, revoked = TRUE \
             WHERE user_id = ? AND expired = FALSE AND revoked = FALSE",
        )
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Failed to revoke tokens", e))?
        .rows_affected();

        Self::bind_insert(&Token::bearer(user_id, token))
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to save token", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit rotation", e))?;

        Ok(revoked as usize)
    }
}
