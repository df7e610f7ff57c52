//! Named-field result rows.

use serde_json::{Map, Value};

use super::errors::{StoreError, StoreResult};

/// One row of a query result: field names mapped to values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// String field; a missing or differently-typed field is a protocol
    /// violation surfaced as an unavailable store.
    pub fn str_field(&self, field: &str) -> StoreResult<&str> {
        self.0
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| Self::malformed(field))
    }

    pub fn i64_field(&self, field: &str) -> StoreResult<i64> {
        self.0
            .get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| Self::malformed(field))
    }

    pub fn u64_field(&self, field: &str) -> StoreResult<u64> {
        self.0
            .get(field)
            .and_then(Value::as_u64)
            .ok_or_else(|| Self::malformed(field))
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    fn malformed(field: &str) -> StoreError {
        StoreError::Unavailable(format!("malformed row: missing field `{}`", field))
    }
}

impl From<Map<String, Value>> for Row {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
