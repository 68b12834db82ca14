//! Authentication route handlers
//!
//! - Signup and login, answering with a token pair
//! - Refresh of the access token
//! - Logout of the presented access token

pub mod login;
pub mod logout;
pub mod refresh;
pub mod signup;

use std::sync::Arc;

use wg_core::repositories::{TokenRepository, UserRepository};
use wg_core::services::auth::AuthService;
use wg_infra::database::DatabasePool;

/// Application state shared across handlers
pub struct AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub auth_service: Arc<AuthService<U, T>>,
    /// Answer 401 instead of an empty 200 when a refresh is ignored
    pub strict_refresh: bool,
    /// Pool probed by the health endpoint, absent for in-memory runs
    pub database: Option<DatabasePool>,
}

impl<U, T> AppState<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(auth_service: Arc<AuthService<U, T>>) -> Self {
        Self {
            auth_service,
            strict_refresh: false,
            database: None,
        }
    }

    pub fn with_strict_refresh(mut self, strict_refresh: bool) -> Self {
        self.strict_refresh = strict_refresh;
        self
    }

    pub fn with_database(mut self, database: DatabasePool) -> Self {
        self.database = Some(database);
        self
    }
}
