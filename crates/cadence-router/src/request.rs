//! Requests routed through a chain

use cadence_core::{RequestId, Value, ValueMap};
use serde::{Deserialize, Serialize};

/// An immutable request
///
/// Handlers receive it by reference; they answer through their
/// [`Verdict`](crate::Verdict) and never mutate the request itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    /// What is being asked, e.g. `"refund"` or `"moderate"`
    pub kind: String,
    pub body: Value,
    pub params: ValueMap,
}

impl Request {
    /// Create a request with a fresh id
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: RequestId::next(),
            kind: kind.into(),
            body: Value::Null,
            params: ValueMap::new(),
        }
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a named parameter, replacing any previous value
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let req = Request::new("refund")
            .with_body(120i64)
            .with_param("currency", "EUR");
        assert_eq!(req.kind, "refund");
        assert_eq!(req.body, Value::Int(120));
        assert_eq!(req.param("currency").and_then(Value::as_str), Some("EUR"));
        assert!(req.param("missing").is_none());
    }

    #[test]
    fn test_ids_are_fresh() {
        assert_ne!(Request::new("a").id, Request::new("a").id);
    }
}
