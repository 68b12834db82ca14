//! Domain entities representing core business objects.

pub mod token;
pub mod user;


// Re-export commonly used types
pub use token::{Claims, Token, TokenType, TokenUse};
pub use user::{mask_email, normalize_email, Role, User};
