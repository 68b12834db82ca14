//! Business services containing domain logic and use cases.

pub mod auth;
pub mod token;

// Re-export commonly used types
pub use auth::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, CredentialMatcher, PasswordHasher,
    RepositoryCredentialMatcher, UserLocks, BEARER_PREFIX,
};
pub use token::{TokenService, TokenServiceConfig};
