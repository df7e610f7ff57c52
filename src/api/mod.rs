//! API Dispatcher
//!
//! Resolves a path-based API call into one of a fixed, closed set of
//! operations and invokes it with the remaining path segments as
//! positional arguments.
//!
//! # Design Principles
//!
//! - Operation names resolve through a static table built at compile time;
//!   unregistered names are rejected before any handler runs
//! - Expected outcomes (missing page, failed guard) become structured
//!   error envelopes, never errors surfacing to the transport layer
//! - Privileged operations run the session guard before touching the
//!   content store
//!
//! # Supported Operations
//!
//! content, source, json, status, auth, pages, tags

mod dispatcher;
mod errors;
mod request;
mod response;

pub use dispatcher::Dispatcher;
pub use errors::{ApiError, ApiResult};
pub use request::{ApiRequest, Operation};
pub use response::ApiResponse;
