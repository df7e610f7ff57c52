//! Session Authentication State
//!
//! Per-session authentication state machine: `Anonymous` (initial) to
//! `Authenticated` (terminal for the life of the session), gated by a
//! challenge/response verification against an external service.
//!
//! ## Invariants
//! - `authenticated` is only reachable through the verify transition and
//!   flips false -> true at most once per session
//! - a negative or failed verifier outcome is not an error; the session
//!   simply stays anonymous and a fresh challenge is issued
//! - one session's state is serialized behind its own lock; different
//!   sessions are fully independent

mod auth;
mod errors;
mod state;
mod store;
mod verifier;

pub use auth::Authenticator;
pub use errors::{AuthError, AuthResult};
pub use state::{SessionState, CREDIT_GRANT};
pub use store::{InMemorySessionStore, SessionStore, SessionToken};
pub use verifier::{ChallengeVerifier, DenyAllVerifier, StaticVerifier, VerifierOutcome};
