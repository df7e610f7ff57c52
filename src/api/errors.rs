//! API error taxonomy.
//!
//! Everything here renders as a structured error envelope; nothing
//! escapes to the transport layer as an exception.

use std::fmt;

use crate::session::AuthError;
use crate::store::GatewayError;

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors an operation can surface to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Operation name outside the closed set
    InvalidMethod,
    /// No page matched the requested path; expected and recoverable
    NotFound,
    /// Privileged operation attempted by an anonymous session
    Unauthenticated,
    /// The backing store call failed; surfaced, never retried here
    StoreUnavailable(String),
}

impl ApiError {
    /// Status code carried in the error envelope
    pub fn code(&self) -> u16 {
        match self {
            ApiError::InvalidMethod => 400,
            ApiError::NotFound => 404,
            ApiError::Unauthenticated => 401,
            ApiError::StoreUnavailable(_) => 503,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::InvalidMethod => "Invalid method.".to_string(),
            ApiError::NotFound => "Page does not exist.".to_string(),
            ApiError::Unauthenticated => {
                "You must be authenticated to perform this action.".to_string()
            }
            ApiError::StoreUnavailable(reason) => format!("Store unavailable: {}", reason),
        }
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound => ApiError::NotFound,
            GatewayError::Store(e) => ApiError::StoreUnavailable(e.to_string()),
            // Malformed builder input is a programmer error; to the client
            // it is indistinguishable from a failed store call.
            GatewayError::Query(e) => ApiError::StoreUnavailable(e.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthenticated => ApiError::Unauthenticated,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::InvalidMethod.code(), 400);
        assert_eq!(ApiError::NotFound.code(), 404);
        assert_eq!(ApiError::Unauthenticated.code(), 401);
        assert_eq!(ApiError::StoreUnavailable("x".to_string()).code(), 503);
    }

    #[test]
    fn test_gateway_not_found_maps_to_404() {
        assert_eq!(ApiError::from(GatewayError::NotFound), ApiError::NotFound);
    }

    #[test]
    fn test_gateway_store_failure_maps_to_503() {
        let err = ApiError::from(GatewayError::Store(StoreError::Unavailable(
            "down".to_string(),
        )));
        assert_eq!(err.code(), 503);
    }
}
