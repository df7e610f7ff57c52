//! Dispatcher invariants: routing, envelopes, and the privileged-operation
//! guard, exercised end to end against an in-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::Value;

use minnow::api::{ApiRequest, ApiResponse, Dispatcher};
use minnow::markup::MarkupRenderer;
use minnow::session::{Authenticator, InMemorySessionStore, SessionToken, StaticVerifier};
use minnow::store::{Gateway, MemoryStore, Row, Store, StoreError, PAGES_TABLE, TAGS_TABLE};

const VALID_RESPONSE: &str = "open sesame";

/// Renderer that visibly differs from the source form.
struct ParagraphRenderer;

impl MarkupRenderer for ParagraphRenderer {
    fn render(&self, source: &str) -> String {
        format!("<p>{}</p>", source)
    }
}

/// Store wrapper counting protocol calls, for no-side-effect assertions.
struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Store for CountingStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.query(sql, params)
    }
}

/// Store whose every call fails, for unavailable-store assertions.
struct DownStore;

impl Store for DownStore {
    fn query(&self, _sql: &str, _params: &[Value]) -> Result<Vec<Row>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert(
        PAGES_TABLE,
        Row::new()
            .set("id", 1)
            .set("path", "home")
            .set("title", "Home")
            .set("content", "Welcome ashore")
            .set("views", 41)
            .set("edits", "2,9,17")
            .set("modified", 1_300_000_000),
    );
    store.insert(
        PAGES_TABLE,
        Row::new()
            .set("id", 2)
            .set("path", "docs/install")
            .set("title", "Installing")
            .set("content", "Step one")
            .set("views", 7)
            .set("edits", "5")
            .set("modified", 1_300_000_500),
    );
    store.insert(
        TAGS_TABLE,
        Row::new().set("page_id", 1).set("tag", "sea-life").set("views", 3),
    );
    store.insert(
        TAGS_TABLE,
        Row::new().set("page_id", 1).set("tag", "harbor").set("views", 1),
    );
    store
}

fn dispatcher_over(store: Arc<dyn Store>) -> Dispatcher {
    Dispatcher::new(
        Gateway::new(store),
        Authenticator::new(Arc::new(StaticVerifier::new(VALID_RESPONSE))),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(ParagraphRenderer),
    )
}

fn dispatcher() -> Dispatcher {
    dispatcher_over(Arc::new(seeded_store()))
}

fn auth_form(response: &str) -> HashMap<String, String> {
    HashMap::from([
        ("challenge".to_string(), "token".to_string()),
        ("response".to_string(), response.to_string()),
    ])
}

fn error_code(response: &ApiResponse) -> Option<u64> {
    response.as_json().and_then(|v| v["code"].as_u64())
}

#[test]
fn unknown_operation_returns_400_and_invokes_no_handler() {
    let store = Arc::new(CountingStore::new(seeded_store()));
    let dispatcher = dispatcher_over(store.clone());

    for path in ["/api/v1/frobnicate", "/api/v1/edit/home", "/api/v1", "/"] {
        let response = dispatcher.dispatch(&ApiRequest::new(path, SessionToken::new("t")));
        assert!(response.is_error(), "{} should be rejected", path);
        assert_eq!(error_code(&response), Some(400));
        assert_eq!(
            response.as_json().unwrap()["message"],
            "Invalid method."
        );
    }
    assert_eq!(store.calls(), 0);
}

#[test]
fn content_renders_and_source_does_not() {
    let dispatcher = dispatcher();
    let token = SessionToken::new("t");

    let content = dispatcher.dispatch(&ApiRequest::new("/api/v1/content/home", token.clone()));
    assert_eq!(content, ApiResponse::text("<p>Welcome ashore</p>"));

    let source = dispatcher.dispatch(&ApiRequest::new("/api/v1/source/home", token));
    assert_eq!(source, ApiResponse::text("Welcome ashore"));
}

#[test]
fn content_for_missing_page_is_a_structured_404() {
    let dispatcher = dispatcher();
    let response =
        dispatcher.dispatch(&ApiRequest::new("/api/v1/content/nope", SessionToken::new("t")));

    assert!(response.is_error());
    assert_eq!(error_code(&response), Some(404));
}

#[test]
fn multi_segment_paths_rejoin() {
    let dispatcher = dispatcher();
    let response = dispatcher.dispatch(&ApiRequest::new(
        "/api/v1/source/docs/install",
        SessionToken::new("t"),
    ));
    assert_eq!(response, ApiResponse::text("Step one"));
}

#[test]
fn json_envelope_carries_both_forms_and_edit_count() {
    let dispatcher = dispatcher();
    let response = dispatcher.dispatch(&ApiRequest::new("/api/v1/json/home", SessionToken::new("t")));
    let value = response.as_json().unwrap();

    assert_eq!(value["status"], "success");
    assert_eq!(value["code"], 200);
    assert_eq!(value["path"], "home");
    assert_eq!(value["views"], 41);
    // edits equals the cardinality of the edit history
    assert_eq!(value["edits"], 3);
    assert_eq!(value["modified"], 1_300_000_000);
    assert_eq!(value["title"]["formatted"], "<p>Home</p>");
    assert_eq!(value["title"]["source"], "Home");
    assert_eq!(value["content"]["formatted"], "<p>Welcome ashore</p>");
    assert_eq!(value["content"]["source"], "Welcome ashore");
    // tag separators become spaces
    assert_eq!(value["tags"], serde_json::json!(["sea life", "harbor"]));
}

#[test]
fn json_for_missing_page_is_an_error_envelope() {
    let dispatcher = dispatcher();
    let response =
        dispatcher.dispatch(&ApiRequest::new("/api/v1/json/ghost", SessionToken::new("t")));
    let value = response.as_json().unwrap();

    assert_eq!(value["status"], "error");
    assert_eq!(value["code"], 404);
    assert_eq!(value["message"], "Page does not exist.");
}

#[test]
fn store_failure_surfaces_as_5xx_envelope_distinct_from_404() {
    let dispatcher = dispatcher_over(Arc::new(DownStore));
    let response =
        dispatcher.dispatch(&ApiRequest::new("/api/v1/json/home", SessionToken::new("t")));

    assert!(response.is_error());
    assert_eq!(error_code(&response), Some(503));
}

#[test]
fn status_reports_flat_session_state() {
    let dispatcher = dispatcher();
    let response = dispatcher.dispatch(&ApiRequest::new("/api/v1/status", SessionToken::new("t")));

    assert_eq!(
        response.as_json().unwrap(),
        &serde_json::json!({"authed": false, "credits": 0})
    );
}

#[test]
fn guard_failure_never_touches_the_store() {
    let store = Arc::new(CountingStore::new(seeded_store()));
    let dispatcher = dispatcher_over(store.clone());

    for path in ["/api/v1/pages", "/api/v1/tags"] {
        let response = dispatcher.dispatch(&ApiRequest::new(path, SessionToken::new("anon")));
        assert!(response.is_error());
        assert_eq!(
            response.as_json().unwrap()["message"],
            "You must be authenticated to perform this action."
        );
    }
    assert_eq!(store.calls(), 0);
}

#[test]
fn auth_without_form_data_just_reissues_the_challenge() {
    let dispatcher = dispatcher();
    let token = SessionToken::new("t");

    let first = dispatcher.dispatch(&ApiRequest::new("/api/v1/auth", token.clone()));
    let second = dispatcher.dispatch(&ApiRequest::new("/api/v1/auth", token.clone()));
    assert_eq!(first, second);
    assert!(matches!(first, ApiResponse::Text(_)));

    // Still anonymous
    let status = dispatcher.dispatch(&ApiRequest::new("/api/v1/status", token));
    assert_eq!(status.as_json().unwrap()["authed"], false);
}

#[test]
fn auth_with_wrong_response_stays_anonymous_without_error() {
    let dispatcher = dispatcher();
    let token = SessionToken::new("t");

    let response = dispatcher.dispatch(
        &ApiRequest::new("/api/v1/auth", token.clone()).with_form(auth_form("guess")),
    );
    // The challenge form comes back; no error envelope
    assert!(matches!(response, ApiResponse::Text(_)));

    let status = dispatcher.dispatch(&ApiRequest::new("/api/v1/status", token));
    assert_eq!(status.as_json().unwrap()["authed"], false);
}

#[test]
fn anonymous_then_verified_then_listed() {
    // The full scenario: pages() fails anonymously, auth() with a valid
    // response authenticates with credits=10, pages() then succeeds.
    let dispatcher = dispatcher();
    let token = SessionToken::new("scenario");

    let denied = dispatcher.dispatch(&ApiRequest::new("/api/v1/pages", token.clone()));
    assert!(denied.is_error());

    dispatcher.dispatch(
        &ApiRequest::new("/api/v1/auth", token.clone())
            .with_form(auth_form(VALID_RESPONSE))
            .with_client_addr("10.0.0.1"),
    );

    let status = dispatcher.dispatch(&ApiRequest::new("/api/v1/status", token.clone()));
    assert_eq!(
        status.as_json().unwrap(),
        &serde_json::json!({"authed": true, "credits": 10})
    );

    let listed = dispatcher.dispatch(&ApiRequest::new("/api/v1/pages", token));
    let value = listed.as_json().unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(
        value["pages"],
        serde_json::json!([
            {"path": "/home", "title": "Home"},
            {"path": "/docs/install", "title": "Installing"},
        ])
    );
}

#[test]
fn tags_lists_aggregates_for_authenticated_sessions() {
    let dispatcher = dispatcher();
    let token = SessionToken::new("t");

    dispatcher.dispatch(
        &ApiRequest::new("/api/v1/auth", token.clone()).with_form(auth_form(VALID_RESPONSE)),
    );

    let response = dispatcher.dispatch(&ApiRequest::new("/api/v1/tags", token));
    let value = response.as_json().unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(
        value["tags"],
        serde_json::json!([
            {"tag": "sea-life", "count": 1, "views": 3},
            {"tag": "harbor", "count": 1, "views": 1},
        ])
    );
}

#[test]
fn sessions_do_not_leak_authentication() {
    let dispatcher = dispatcher();
    let alice = SessionToken::new("alice");
    let mallory = SessionToken::new("mallory");

    dispatcher.dispatch(
        &ApiRequest::new("/api/v1/auth", alice.clone()).with_form(auth_form(VALID_RESPONSE)),
    );

    assert!(!dispatcher
        .dispatch(&ApiRequest::new("/api/v1/pages", alice))
        .is_error());
    assert!(dispatcher
        .dispatch(&ApiRequest::new("/api/v1/pages", mallory))
        .is_error());
}
