//! Token service module for JWT management
//!
//! This module handles signing and decoding of access and refresh tokens.
//! Persistence of issued tokens lives in `TokenRepository`; the codec itself
//! is stateless apart from its keys.

mod config;
mod service;


pub use config::TokenServiceConfig;
pub use service::TokenService;
