//! minnow - the request-handling core of a small wiki
//!
//! Maps path-based API calls to typed operations, gates privileged
//! operations behind a session-scoped challenge/response verification,
//! and reads content through a generic predicate query builder.

pub mod api;
pub mod cli;
pub mod http_server;
pub mod markup;
pub mod query;
pub mod session;
pub mod store;
