//! Inbound API calls and the operation table.

use std::collections::HashMap;

use crate::session::SessionToken;

/// One inbound API call, already stripped of transport framing.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Full request path, e.g. `/api/v1/json/some/page`
    pub path: String,
    /// Submitted form fields; empty when nothing was posted
    pub form: HashMap<String, String>,
    /// Client network address, forwarded to the verifier
    pub client_addr: String,
    /// Opaque session token held by the transport layer
    pub token: SessionToken,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>, token: SessionToken) -> Self {
        Self {
            path: path.into(),
            form: HashMap::new(),
            client_addr: String::new(),
            token,
        }
    }

    pub fn with_form(mut self, form: HashMap<String, String>) -> Self {
        self.form = form;
        self
    }

    pub fn with_client_addr(mut self, addr: impl Into<String>) -> Self {
        self.client_addr = addr.into();
        self
    }
}

/// The closed set of operations the dispatcher can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Content,
    Source,
    Json,
    Status,
    Auth,
    Pages,
    Tags,
}

impl Operation {
    /// Resolve an operation name. The table is fixed at compile time;
    /// names outside it are rejected before any handler runs.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "content" => Some(Self::Content),
            "source" => Some(Self::Source),
            "json" => Some(Self::Json),
            "status" => Some(Self::Status),
            "auth" => Some(Self::Auth),
            "pages" => Some(Self::Pages),
            "tags" => Some(Self::Tags),
            _ => None,
        }
    }

    /// Whether the operation requires an authenticated session.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::Pages | Self::Tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_operations_resolve() {
        for name in ["content", "source", "json", "status", "auth", "pages", "tags"] {
            assert!(Operation::parse(name).is_some(), "{} should resolve", name);
        }
    }

    #[test]
    fn test_unknown_operations_rejected() {
        assert_eq!(Operation::parse("edit"), None);
        assert_eq!(Operation::parse(""), None);
        assert_eq!(Operation::parse("Content"), None);
    }

    #[test]
    fn test_privileged_set() {
        assert!(Operation::Pages.is_privileged());
        assert!(Operation::Tags.is_privileged());
        assert!(!Operation::Json.is_privileged());
        assert!(!Operation::Auth.is_privileged());
    }
}
