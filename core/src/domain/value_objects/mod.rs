//! Value objects representing immutable domain concepts.

pub mod auth_response;
pub mod refresh_outcome;
pub mod registration;

// Re-export commonly used types
pub use auth_response::AuthResponse;
pub use refresh_outcome::{RefreshIgnored, RefreshOutcome};
pub use registration::Registration;
