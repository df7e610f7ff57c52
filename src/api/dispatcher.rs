//! The method dispatcher.
//!
//! Orchestrates session state, the content store gateway, and the
//! rendering seam behind one `dispatch` entry point. One session's state
//! stays locked for the whole request, so requests belonging to the same
//! session are processed one at a time.

use std::sync::Arc;

use serde_json::{json, Value};
use tracing::debug;

use crate::markup::MarkupRenderer;
use crate::session::{Authenticator, SessionState, SessionStore};
use crate::store::Gateway;

use super::errors::{ApiError, ApiResult};
use super::request::{ApiRequest, Operation};
use super::response::ApiResponse;

/// Leading path segments (api prefix + version) stripped before the
/// operation name.
const PREFIX_SEGMENTS: usize = 2;

/// Form field names carrying the challenge/response pair.
const CHALLENGE_FIELD: &str = "challenge";
const RESPONSE_FIELD: &str = "response";

pub struct Dispatcher {
    gateway: Gateway,
    authenticator: Authenticator,
    sessions: Arc<dyn SessionStore>,
    renderer: Arc<dyn MarkupRenderer>,
}

impl Dispatcher {
    pub fn new(
        gateway: Gateway,
        authenticator: Authenticator,
        sessions: Arc<dyn SessionStore>,
        renderer: Arc<dyn MarkupRenderer>,
    ) -> Self {
        Self {
            gateway,
            authenticator,
            sessions,
            renderer,
        }
    }

    /// Handle one API call. Never fails outward; every outcome is a
    /// response body.
    pub fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let (operation, args) = match Self::route(&request.path) {
            Some(parts) => parts,
            None => return ApiResponse::error(&ApiError::InvalidMethod),
        };

        let handle = self.sessions.session(&request.token);
        let mut state = handle.lock().expect("Lock poisoned");

        let result = match operation {
            Operation::Content => self.content(&args),
            Operation::Source => self.source(&args),
            Operation::Json => self.json(&args),
            Operation::Status => Ok(self.status(&state)),
            Operation::Auth => Ok(self.auth(&mut state, request)),
            Operation::Pages => self.pages(&mut state),
            Operation::Tags => self.tags(&mut state),
        };

        match result {
            Ok(response) => response,
            Err(err) => {
                debug!(?operation, %err, "operation resolved to an error envelope");
                ApiResponse::error(&err)
            }
        }
    }

    /// Split a path into operation and positional arguments, past the
    /// fixed `/<prefix>/<version>` lead-in.
    fn route(path: &str) -> Option<(Operation, Vec<String>)> {
        let mut segments = path.trim_matches('/').split('/').skip(PREFIX_SEGMENTS);
        let operation = Operation::parse(segments.next()?)?;
        Some((operation, segments.map(str::to_string).collect()))
    }

    /// Remaining segments joined back into a page path.
    fn page_path(args: &[String]) -> String {
        args.join("/")
    }

    fn content(&self, args: &[String]) -> ApiResult<ApiResponse> {
        let page = self.gateway.page(&Self::page_path(args))?;
        Ok(ApiResponse::text(self.renderer.render(&page.content)))
    }

    fn source(&self, args: &[String]) -> ApiResult<ApiResponse> {
        let page = self.gateway.page(&Self::page_path(args))?;
        Ok(ApiResponse::text(page.content))
    }

    fn json(&self, args: &[String]) -> ApiResult<ApiResponse> {
        let page = self.gateway.page(&Self::page_path(args))?;
        let tags: Vec<String> = self
            .gateway
            .tags_for_page(page.id)?
            .into_iter()
            .map(|tag| tag.text)
            .collect();

        Ok(ApiResponse::json(json!({
            "status": "success",
            "code": 200,
            "path": page.path,
            "views": page.views,
            "edits": page.edits.len(),
            "modified": page.modified.timestamp(),
            "title": {
                "formatted": self.renderer.render(&page.title),
                "source": page.title,
            },
            "content": {
                "formatted": self.renderer.render(&page.content),
                "source": page.content,
            },
            "tags": tags,
        })))
    }

    /// Current session state as a flat structure.
    fn status(&self, state: &SessionState) -> ApiResponse {
        ApiResponse::json(json!({
            "authed": state.authenticated,
            "credits": state.credits,
        }))
    }

    /// Advance the verify transition when form data is present, then
    /// always re-issue the challenge form. Never fails.
    fn auth(&self, state: &mut SessionState, request: &ApiRequest) -> ApiResponse {
        if !request.form.is_empty() {
            let challenge = request
                .form
                .get(CHALLENGE_FIELD)
                .map(String::as_str)
                .unwrap_or_default();
            let response = request
                .form
                .get(RESPONSE_FIELD)
                .map(String::as_str)
                .unwrap_or_default();
            let outcome =
                self.authenticator
                    .verify(state, &request.client_addr, challenge, response);
            debug!(?outcome, "auth transition evaluated");
        }
        ApiResponse::text(self.authenticator.challenge_form())
    }

    fn pages(&self, state: &mut SessionState) -> ApiResult<ApiResponse> {
        self.authenticator.require_authenticated(state)?;

        let listing: Vec<Value> = self
            .gateway
            .list_pages()?
            .into_iter()
            .map(|page| {
                json!({
                    "path": format!("/{}", page.path),
                    "title": page.title,
                })
            })
            .collect();

        Ok(ApiResponse::json(json!({
            "status": "success",
            "pages": listing,
        })))
    }

    fn tags(&self, state: &mut SessionState) -> ApiResult<ApiResponse> {
        self.authenticator.require_authenticated(state)?;

        let listing: Vec<Value> = self
            .gateway
            .tag_stats()?
            .into_iter()
            .map(|stats| {
                json!({
                    "tag": stats.tag,
                    "count": stats.count,
                    "views": stats.views,
                })
            })
            .collect();

        Ok(ApiResponse::json(json!({
            "status": "success",
            "tags": listing,
        })))
    }
}
