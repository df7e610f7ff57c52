//! HTTP hosting layer
//!
//! Thin transport binding around the transport-agnostic dispatcher:
//! cookie-held session tokens, form bodies, client addresses. The core
//! never depends on this module; swap it out to host the API elsewhere.

mod config;
mod routes;
mod server;

pub use config::HttpServerConfig;
pub use routes::{api_routes, AppState, SESSION_COOKIE};
pub use server::HttpServer;
