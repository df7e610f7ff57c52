//! The external challenge/response verification seam.

/// Outcome of one external verification call.
///
/// `Rejected` and `Error` both leave the session anonymous, but they stay
/// distinguishable so hosts can log transport failures separately from
/// wrong answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifierOutcome {
    /// The response was valid
    Verified,
    /// The response was wrong
    Rejected,
    /// The verifier call itself failed
    Error(String),
}

/// The remote challenge/response verification service.
///
/// Blocking; hosts impose timeouts at the transport boundary.
pub trait ChallengeVerifier: Send + Sync {
    /// Check one challenge/response pair for the given client address.
    fn check(&self, client_addr: &str, challenge: &str, response: &str) -> VerifierOutcome;

    /// The challenge widget shown to unauthenticated clients.
    fn challenge_form(&self) -> String {
        "<form method='post'>\
         <input type='hidden' name='challenge' value='default'/>\
         <input type='text' name='response'/>\
         <input type='submit'/>\
         </form>"
            .to_string()
    }
}

/// Verifier that accepts a single expected response. Stands in for the
/// remote service in tests and local serving.
#[derive(Debug, Clone)]
pub struct StaticVerifier {
    expected: String,
}

impl StaticVerifier {
    pub fn new(expected: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl ChallengeVerifier for StaticVerifier {
    fn check(&self, _client_addr: &str, _challenge: &str, response: &str) -> VerifierOutcome {
        if response == self.expected {
            VerifierOutcome::Verified
        } else {
            VerifierOutcome::Rejected
        }
    }
}

/// Verifier that rejects everything; the safe default when no real
/// verifier is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllVerifier;

impl ChallengeVerifier for DenyAllVerifier {
    fn check(&self, _client_addr: &str, _challenge: &str, _response: &str) -> VerifierOutcome {
        VerifierOutcome::Rejected
    }
}
