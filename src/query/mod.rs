//! Query Builder
//!
//! Turns a selection description into a parametrized read query against
//! one table. Every value from the selection is bound as a parameter,
//! never interpolated into the query text.
//!
//! # Supported shapes
//!
//! - equality criteria joined by one boolean operator (`AND` default, `OR`)
//! - the always-true selection (`Selection::all`) for "everything" reads
//! - an optional explicit projection (default `*`)
//! - an optional group-by for store-side aggregation

mod builder;
mod errors;

pub use builder::{build_select, Criterion, Glue, Projection, Selection};
pub use errors::{QueryError, QueryResult};
