//! Process-local repositories
//!
//! Backed by `tokio::sync::RwLock` maps. Suitable for tests and single-node
//! runs; state is lost on restart.

mod token_repository;
mod user_repository;

pub use token_repository::InMemoryTokenRepository;
pub use user_repository::InMemoryUserRepository;
