use bridge_traits::error::{BackendError, IdentityError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Malformed credentials rejected by the backend, surfaced verbatim.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Native sign-in nominally succeeded but returned no usable token.
    #[error("No identity token received from the native provider")]
    MissingToken,

    /// The user dismissed the native sign-in dialog.
    #[error("Native sign-in was cancelled")]
    Cancelled,

    /// Native identity provider misconfiguration or network failure.
    #[error("Native identity provider error: {0}")]
    Provider(String),

    /// Native sign-out found no active session. Recovered locally during
    /// sign-out; surfaced only if it leaks out of another operation.
    #[error("No active native session")]
    NotSignedIn,

    /// Any backend call failure.
    #[error("Backend request failed: {0}")]
    Backend(String),

    /// The operation exceeded the configured auth timeout.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl AuthError {
    /// Whether retrying the failed operation can plausibly succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthError::Cancelled | AuthError::Backend(_) | AuthError::Timeout(_)
        )
    }
}

impl From<BackendError> for AuthError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Validation(message) => AuthError::Validation(message),
            BackendError::Request(message) => AuthError::Backend(message),
        }
    }
}

impl From<IdentityError> for AuthError {
    fn from(error: IdentityError) -> Self {
        match error {
            IdentityError::Cancelled => AuthError::Cancelled,
            IdentityError::Provider(message) => AuthError::Provider(message),
            IdentityError::NotSignedIn => AuthError::NotSignedIn,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;

/// Outcome of an auth broker operation: success marker or typed error.
pub type AuthResult = Result<()>;
