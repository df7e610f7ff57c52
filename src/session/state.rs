//! Per-session authentication state.

use serde::{Deserialize, Serialize};

/// Credits granted when a session first authenticates.
pub const CREDIT_GRANT: u32 = 10;

/// One client's session state.
///
/// Created lazily on first contact; lives for the life of the transport
/// session. `authenticated` flips false -> true exactly once, through
/// [`crate::session::Authenticator::verify`]; nothing else writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "authed")]
    pub authenticated: bool,
    pub credits: u32,
    /// One-time marker set by the verification that authenticated this
    /// session; consumed by the first privileged call.
    #[serde(skip)]
    pub bypass: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            authenticated: false,
            credits: 0,
            bypass: false,
        }
    }
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Transition to the authenticated state with the fixed credit grant.
    pub(crate) fn grant(&mut self) {
        self.authenticated = true;
        self.credits = CREDIT_GRANT;
        self.bypass = true;
    }
}
