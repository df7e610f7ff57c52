//! API response bodies.
//!
//! JSON-producing operations return success/error envelopes with a
//! status, optional code, and message; content-producing operations
//! return raw display text.

use serde_json::{json, Value};

use super::errors::ApiError;

/// Body returned to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Raw display text (page content, challenge form)
    Text(String),
    /// Structured success/error envelope
    Json(Value),
}

impl ApiResponse {
    pub fn text(body: impl Into<String>) -> Self {
        ApiResponse::Text(body.into())
    }

    pub fn json(value: Value) -> Self {
        ApiResponse::Json(value)
    }

    /// Structured error envelope for an API error.
    pub fn error(err: &ApiError) -> Self {
        ApiResponse::Json(json!({
            "status": "error",
            "code": err.code(),
            "message": err.message(),
        }))
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            ApiResponse::Json(value)
                if value.get("status").and_then(Value::as_str) == Some("error")
        )
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }

    /// Serialized body for the wire.
    pub fn body(&self) -> String {
        match self {
            ApiResponse::Text(text) => text.clone(),
            ApiResponse::Json(value) => value.to_string(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ApiResponse::Text(_) => "text/html; charset=utf-8",
            ApiResponse::Json(_) => "application/json",
        }
    }
}
