//! Store and gateway error types.

use thiserror::Error;

use crate::query::QueryError;

/// Result type for store protocol operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failures of the store protocol itself
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The backing store call failed
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Outcomes of a gateway read
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// No row matched; an expected, recoverable outcome
    #[error("No matching row")]
    NotFound,

    /// The store protocol failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The gateway produced a malformed query (programmer error)
    #[error(transparent)]
    Query(#[from] QueryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_distinct_from_unavailable() {
        let not_found = GatewayError::NotFound;
        let unavailable = GatewayError::from(StoreError::Unavailable("down".to_string()));
        assert_ne!(not_found, unavailable);
    }
}
