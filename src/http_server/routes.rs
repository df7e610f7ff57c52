//! API routes.
//!
//! Binds cookies, form bodies, and client addresses to [`ApiRequest`]s
//! and relays the dispatcher's response bodies.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{ConnectInfo, Form, OriginalUri, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};

use crate::api::{ApiRequest, Dispatcher};
use crate::session::SessionToken;

/// Cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "wiki_session";

/// Shared state behind the API routes.
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// The `/api/<version>/...` catch-all, GET and POST.
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/:version/*rest", get(get_handler).post(post_handler))
        .with_state(state)
}

async fn get_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    relay(&state, addr, uri.path(), &headers, HashMap::new())
}

async fn post_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    relay(&state, addr, uri.path(), &headers, form)
}

fn relay(
    state: &AppState,
    addr: SocketAddr,
    path: &str,
    headers: &HeaderMap,
    form: HashMap<String, String>,
) -> Response {
    let (token, minted) = session_token(headers);
    let request = ApiRequest::new(path, token.clone())
        .with_client_addr(addr.ip().to_string())
        .with_form(form);

    let response = state.dispatcher.dispatch(&request);

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, response.content_type());
    if minted {
        builder = builder.header(
            header::SET_COOKIE,
            format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, token.as_str()),
        );
    }
    builder
        .body(Body::from(response.body()))
        .expect("response build cannot fail")
}

/// Token from the session cookie, or a freshly minted one.
fn session_token(headers: &HeaderMap) -> (SessionToken, bool) {
    let cookies = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    for pair in cookies.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=') {
            if name == SESSION_COOKIE && !value.is_empty() {
                return (SessionToken::new(value), false);
            }
        }
    }
    (SessionToken::generate(), true)
}
