//! Content store
//!
//! The backing relational store is an external collaborator reached through
//! a parametrized query protocol: (query text, ordered bound parameters) in,
//! cursor of named-field rows out. The [`Gateway`] shapes the core's typed
//! read operations on top of that protocol via the query builder.
//!
//! # Failure semantics
//!
//! Any protocol failure surfaces as [`StoreError::Unavailable`]. A read that
//! matches nothing is [`GatewayError::NotFound`], a normal outcome callers
//! must be able to tell apart from an unavailable store.

mod errors;
mod gateway;
mod memory;
mod row;

use serde_json::Value;

pub use errors::{GatewayError, GatewayResult, StoreError, StoreResult};
pub use gateway::{Gateway, Page, PageSummary, Tag, TagStats, PAGES_TABLE, TAGS_TABLE};
pub use memory::MemoryStore;
pub use row::Row;

/// The parametrized query protocol of the backing store.
///
/// Implementations execute one read query and return every matching row.
/// Blocking and synchronous; no retries happen at this level.
pub trait Store: Send + Sync {
    fn query(&self, sql: &str, params: &[Value]) -> StoreResult<Vec<Row>>;
}
