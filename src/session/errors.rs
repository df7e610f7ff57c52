//! Session authentication error types.

use thiserror::Error;

/// Result type for session guard checks
pub type AuthResult<T> = Result<T, AuthError>;

/// Session authentication errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Privileged operation attempted by an anonymous session
    #[error("You must be authenticated to perform this action.")]
    Unauthenticated,
}
