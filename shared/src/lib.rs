//! Shared configuration and common types for the wishlist gateway
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - The error body returned by every endpoint

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, ServerConfig,
};
pub use errors::{error_codes, ErrorResponse};
