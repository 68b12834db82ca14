//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Embedded schema migrations
//! - Repository implementations with transactional token rotation

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::{MySqlTokenRepository, MySqlUserRepository};

use wg_core::errors::DomainError;

/// Wrap a sqlx failure into the domain's internal error
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "{}", context);
    DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}
