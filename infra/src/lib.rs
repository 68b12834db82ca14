//! # Infrastructure Layer
//!
//! Concrete implementations of the repository traits declared in `wg_core`:
//! - **Database**: MySQL pool, embedded migrations and repositories using SQLx
//! - **Memory**: process-local repositories for tests and single-node runs
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use wg_core::errors::*;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory repositories
pub mod memory;

#[cfg(feature = "mysql")]
pub use database::{DatabasePool, MySqlTokenRepository, MySqlUserRepository, PoolStatistics};
pub use memory::{InMemoryTokenRepository, InMemoryUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
