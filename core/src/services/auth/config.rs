//! Configuration for the authentication service

use wg_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor used when hashing new passwords
    pub password_hash_cost: u32,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            password_hash_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            password_hash_cost: config.password_hash_cost,
        }
    }
}
