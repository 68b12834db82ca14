//! Authentication service module
//!
//! This module provides the session coordinator of the gateway:
//! - User registration and login
//! - Refresh of access tokens
//! - Logout and access token validation for guarded routes

mod config;
mod credentials;
mod locks;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use credentials::{
    BcryptPasswordHasher, CredentialMatcher, PasswordHasher, RepositoryCredentialMatcher,
};
pub use locks::UserLocks;
pub use service::{AuthService, BEARER_PREFIX};
