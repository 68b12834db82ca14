//! Registration input for the session coordinator.

use crate::domain::entities::user::Role;

/// Details supplied by a new user at signup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    /// Plaintext password, hashed before anything is persisted
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn new(
        firstname: impl Into<String>,
        lastname: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            firstname: firstname.into(),
            lastname: lastname.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}
