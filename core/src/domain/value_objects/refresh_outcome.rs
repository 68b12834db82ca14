//! Result of a refresh attempt that did not fail outright.

use super::auth_response::AuthResponse;

/// Why a refresh request produced no tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshIgnored {
    /// No `Authorization` header, or it does not start with `Bearer `
    MissingBearer,
    /// The presented token is authentic but expired or not owned by its subject
    InvalidRefreshToken,
}

impl RefreshIgnored {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshIgnored::MissingBearer => "missing_bearer",
            RefreshIgnored::InvalidRefreshToken => "invalid_refresh_token",
        }
    }
}

/// Outcome of `AuthService::refresh`
///
/// Hard failures (tampered token, unknown subject) are reported through
/// `DomainError`; this type only distinguishes a fresh pair from a request
/// that was deliberately ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Issued(AuthResponse),
    Ignored(RefreshIgnored),
}

impl RefreshOutcome {
    /// Returns the issued pair, if any
    pub fn issued(self) -> Option<AuthResponse> {
        match self {
            RefreshOutcome::Issued(response) => Some(response),
            RefreshOutcome::Ignored(_) => None,
        }
    }

    pub fn is_issued(&self) -> bool {
        matches!(self, RefreshOutcome::Issued(_))
    }
}
