//! The authentication state machine driver.

use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use super::errors::{AuthError, AuthResult};
use super::state::SessionState;
use super::verifier::{ChallengeVerifier, VerifierOutcome};

/// Drives the session authentication transitions.
pub struct Authenticator {
    verifier: Arc<dyn ChallengeVerifier>,
    /// When set, a response matching this pattern authenticates without
    /// calling the external verifier. An operations escape hatch; off
    /// unless explicitly configured.
    bypass_pattern: Option<Regex>,
}

impl Authenticator {
    pub fn new(verifier: Arc<dyn ChallengeVerifier>) -> Self {
        Self {
            verifier,
            bypass_pattern: None,
        }
    }

    pub fn with_bypass_pattern(mut self, pattern: Regex) -> Self {
        self.bypass_pattern = Some(pattern);
        self
    }

    /// Advance the verify transition.
    ///
    /// An already-authenticated session succeeds immediately; the external
    /// verifier is never re-run for it. A negative or failed outcome leaves
    /// the session anonymous without surfacing an error; the caller simply
    /// re-issues a challenge.
    pub fn verify(
        &self,
        state: &mut SessionState,
        client_addr: &str,
        challenge: &str,
        response: &str,
    ) -> VerifierOutcome {
        if state.is_authenticated() {
            return VerifierOutcome::Verified;
        }

        if let Some(pattern) = &self.bypass_pattern {
            if pattern.is_match(response) {
                debug!("bypass pattern matched; skipping external verification");
                state.grant();
                return VerifierOutcome::Verified;
            }
        }

        let outcome = self.verifier.check(client_addr, challenge, response);
        match &outcome {
            VerifierOutcome::Verified => state.grant(),
            VerifierOutcome::Rejected => {
                debug!(client_addr, "verification rejected; session stays anonymous");
            }
            VerifierOutcome::Error(reason) => {
                warn!(client_addr, %reason, "verifier call failed; session stays anonymous");
            }
        }
        outcome
    }

    /// The challenge widget for the next attempt.
    pub fn challenge_form(&self) -> String {
        self.verifier.challenge_form()
    }

    /// Guard for privileged operations.
    ///
    /// On failure the caller must return the structured error response
    /// without touching the gateway. On success the one-time bypass marker
    /// is consumed; this is its only consumption point.
    pub fn require_authenticated(&self, state: &mut SessionState) -> AuthResult<()> {
        if !state.is_authenticated() {
            return Err(AuthError::Unauthenticated);
        }
        state.bypass = false;
        Ok(())
    }
}
