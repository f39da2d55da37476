//! Untyped per-request input.

use std::collections::BTreeMap;

use crate::{RawValue, Source};

/// Bag of raw values keyed by `(source, key)`.
///
/// Header keys are stored and looked up lower-cased. Inserting an existing
/// key replaces the previous value, so repeated query parameters resolve to
/// the last occurrence.
///
/// ```rust
/// use thales_core::{RawRequest, Source};
///
/// let raw = RawRequest::new()
///     .with(Source::Path, "item_id", "42")
///     .with(Source::Header, "X-Token", "abc");
///
/// assert_eq!(raw.get(Source::Path, "item_id").and_then(|v| v.as_text()), Some("42"));
/// assert!(raw.contains(Source::Header, "x-token"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    values: BTreeMap<(Source, String), RawValue>,
}

impl RawRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(source: Source, key: &str) -> String {
        if source == Source::Header {
            key.to_ascii_lowercase()
        } else {
            key.to_string()
        }
    }

    /// Inserts a value, replacing any previous value under the same key.
    pub fn insert(&mut self, source: Source, key: &str, value: impl Into<RawValue>) {
        self.values
            .insert((source, Self::normalize(source, key)), value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, source: Source, key: &str, value: impl Into<RawValue>) -> Self {
        self.insert(source, key, value);
        self
    }

    /// Inserts every key of a JSON object under `source`.
    pub fn extend_json(&mut self, source: Source, object: serde_json::Map<String, serde_json::Value>) {
        for (key, value) in object {
            self.insert(source, &key, RawValue::Json(value));
        }
    }

    /// Returns the value stored under `(source, key)`.
    #[must_use]
    pub fn get(&self, source: Source, key: &str) -> Option<&RawValue> {
        self.values.get(&(source, Self::normalize(source, key)))
    }

    /// Returns true if a value is stored under `(source, key)`.
    #[must_use]
    pub fn contains(&self, source: Source, key: &str) -> bool {
        self.get(source, key).is_some()
    }

    /// Returns the number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(source, key, value)` in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = (Source, &str, &RawValue)> {
        self.values
            .iter()
            .map(|((source, key), value)| (*source, key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_value_wins() {
        let mut raw = RawRequest::new();
        raw.insert(Source::Query, "skip", "1");
        raw.insert(Source::Query, "skip", "2");
        assert_eq!(raw.len(), 1);
        assert_eq!(raw.get(Source::Query, "skip"), Some(&RawValue::from("2")));
    }

    #[test]
    fn test_sources_are_separate() {
        let raw = RawRequest::new()
            .with(Source::Path, "id", "1")
            .with(Source::Query, "id", "2");
        assert_eq!(raw.get(Source::Path, "id"), Some(&RawValue::from("1")));
        assert_eq!(raw.get(Source::Query, "id"), Some(&RawValue::from("2")));
        assert!(!raw.contains(Source::Form, "id"));
    }

    #[test]
    fn test_header_case_insensitive() {
        let raw = RawRequest::new().with(Source::Header, "User-Agent", "curl");
        assert!(raw.contains(Source::Header, "user-agent"));
        assert!(raw.contains(Source::Header, "USER-AGENT"));
    }

    #[test]
    fn test_query_keys_case_sensitive() {
        let raw = RawRequest::new().with(Source::Query, "Q", "x");
        assert!(!raw.contains(Source::Query, "q"));
    }

    #[test]
    fn test_extend_json() {
        let body = serde_json::json!({"name": "Foo", "price": 4.2});
        let mut raw = RawRequest::new();
        if let serde_json::Value::Object(map) = body {
            raw.extend_json(Source::Body, map);
        }
        assert_eq!(
            raw.get(Source::Body, "price"),
            Some(&RawValue::Json(serde_json::json!(4.2)))
        );
        assert_eq!(raw.iter().count(), 2);
    }
}
