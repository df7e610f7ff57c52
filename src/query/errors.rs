//! Query builder error types.
//!
//! These signal malformed builder input from internal callers; they are
//! programmer errors and should not occur in normal operation.

use thiserror::Error;

/// Result type for query builder operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while shaping a selection into a query
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Selection description is empty or not a mapping
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Requested combination operator is neither conjunction nor disjunction
    #[error("Unknown glue operator: {0}")]
    UnknownOperator(String),
}
