//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which flow a signed token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    /// Short-lived credential for API calls
    Access,
    /// Long-lived credential for minting access tokens
    Refresh,
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique identifier for the token)
    pub jti: String,

    /// Access or refresh
    pub token_use: TokenUse,
}

impl Claims {
    /// Creates claims for `subject` that expire `lifetime` from now
    pub fn new(subject: &str, issuer: &str, token_use: TokenUse, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_use,
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Type tag of a stored token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    #[default]
    Bearer,
}

impl TokenType {
    /// Returns the persisted representation of the type
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Bearer => "BEARER",
        }
    }
}

impl std::str::FromStr for TokenType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "BEARER" => Ok(TokenType::Bearer),
            _ => Err(format!("Invalid token type: {}", s)),
        }
    }
}

/// Access token record kept by the token store
///
/// A record is created for every issued access token and is never deleted;
/// superseded tokens are flipped to expired and revoked instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Raw signed token string
    pub token: String,

    /// Always `Bearer`
    pub token_type: TokenType,

    /// Whether the token has expired
    pub expired: bool,

    /// Whether the token has been revoked
    pub revoked: bool,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Creates a valid bearer record for `token`
    pub fn bearer(user_id: Uuid, token: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token: token.into(),
            token_type: TokenType::Bearer,
            expired: false,
            revoked: false,
            created_at: Utc::now(),
        }
    }

    /// A record is valid while neither flag is set
    pub fn is_valid(&self) -> bool {
        !self.expired && !self.revoked
    }

    /// Marks the record expired and revoked
    pub fn revoke(&mut self) {
        self.expired = true;
        self.revoked = true;
    }
}
