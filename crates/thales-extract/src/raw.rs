//! Collection of raw request input.
//!
//! [`raw_request`] flattens an [`ExtractionContext`] into the untyped
//! [`RawRequest`] the engine validates. Nothing here interprets field
//! types; it only decides which bytes land under which `(source, key)`.

use http::HeaderValue;
use thales_core::{RawRequest, Source};
use tracing::trace;

use crate::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};

/// Default maximum body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Knobs for raw input collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Bodies larger than this are rejected with 413.
    pub max_body_bytes: usize,
    /// Reject non-empty bodies whose Content-Type is neither JSON nor a
    /// URL-encoded form. When false such bodies are ignored.
    pub strict_content_type: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            strict_content_type: false,
        }
    }
}

/// How a body is read, decided by its media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

impl BodyKind {
    fn of(media_type: Option<&str>) -> Self {
        match media_type {
            // Clients that omit the header are assumed to send JSON.
            None => Self::Json,
            Some(JSON) => Self::Json,
            Some(mt) if mt.ends_with("+json") => Self::Json,
            Some(FORM) => Self::Form,
            Some(_) => Self::Other,
        }
    }
}

/// Collects every path, query, header and body value of the request.
///
/// - Path parameters go under [`Source::Path`].
/// - Query pairs are URL-decoded; a repeated key keeps its last value.
/// - Header names are lower-cased; a repeated header keeps its last value.
/// - A JSON object body contributes one [`Source::Body`] entry per key; a
///   URL-encoded form body contributes [`Source::Form`] entries. An empty
///   body contributes nothing.
///
/// # Errors
///
/// Returns an [`ExtractionError`] when the body exceeds
/// [`ExtractOptions::max_body_bytes`], is not valid JSON or not a JSON
/// object, or (in strict mode) has an unsupported Content-Type.
pub fn raw_request(
    ctx: &ExtractionContext,
    options: &ExtractOptions,
) -> Result<RawRequest, ExtractionError> {
    let mut raw = RawRequest::new();

    for (name, value) in ctx.path_params().iter() {
        raw.insert(Source::Path, name, value);
    }

    if let Some(query) = ctx.query_string() {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).map_err(|e| {
            ExtractionError::deserialization_failed(ExtractionSource::Query, e.to_string())
        })?;
        for (key, value) in pairs {
            raw.insert(Source::Query, &key, value);
        }
    }

    for (name, value) in ctx.headers() {
        raw.insert(Source::Header, name.as_str(), header_text(value));
    }

    collect_body(ctx, options, &mut raw)?;

    trace!(
        method = %ctx.method(),
        path = %ctx.path(),
        values = raw.len(),
        "raw request collected"
    );

    Ok(raw)
}

/// Header bytes outside visible ASCII (obs-text) are read as Latin-1.
fn header_text(value: &HeaderValue) -> String {
    value.to_str().map_or_else(
        |_| value.as_bytes().iter().copied().map(char::from).collect(),
        str::to_string,
    )
}

fn collect_body(
    ctx: &ExtractionContext,
    options: &ExtractOptions,
    raw: &mut RawRequest,
) -> Result<(), ExtractionError> {
    let body = ctx.body();
    if body.len() > options.max_body_bytes {
        return Err(ExtractionError::payload_too_large(
            options.max_body_bytes,
            body.len(),
        ));
    }
    if body.is_empty() {
        return Ok(());
    }

    let media_type = ctx.media_type();
    match BodyKind::of(media_type.as_deref()) {
        BodyKind::Json => {
            let value: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
                ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
            })?;
            match value {
                serde_json::Value::Object(object) => raw.extend_json(Source::Body, object),
                other => {
                    return Err(ExtractionError::deserialization_failed(
                        ExtractionSource::Body,
                        format!("expected a JSON object, got {}", json_kind(&other)),
                    ))
                }
            }
        }
        BodyKind::Form => {
            let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).map_err(|e| {
                ExtractionError::deserialization_failed(ExtractionSource::Body, e.to_string())
            })?;
            for (key, value) in pairs {
                raw.insert(Source::Form, &key, value);
            }
        }
        BodyKind::Other if options.strict_content_type => {
            return Err(ExtractionError::unsupported_media_type(
                JSON,
                media_type.as_deref(),
            ));
        }
        BodyKind::Other => {}
    }

    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl FromRequest for RawRequest {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        raw_request(ctx, &ExtractOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionContextBuilder;
    use http::{Method, StatusCode};
    use serde_json::json;
    use thales_core::RawValue;

    #[test]
    fn test_path_query_and_headers() {
        let ctx = ExtractionContextBuilder::new()
            .uri("/checked/items/5?q=foo&size=5.0&q=bar&name=Hello%20World")
            .header("X-Token", "abc")
            .path_param("item_id", "5")
            .build();

        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();

        assert_eq!(raw.get(Source::Path, "item_id"), Some(&RawValue::from("5")));
        assert_eq!(raw.get(Source::Query, "q"), Some(&RawValue::from("bar")));
        assert_eq!(raw.get(Source::Query, "size"), Some(&RawValue::from("5.0")));
        assert_eq!(
            raw.get(Source::Query, "name"),
            Some(&RawValue::from("Hello World"))
        );
        assert_eq!(raw.get(Source::Header, "x-token"), Some(&RawValue::from("abc")));
    }

    #[test]
    fn test_obs_text_header_read_as_latin1() {
        let ctx = ExtractionContextBuilder::new()
            .uri("/raw/items/foo")
            .header("x-note", "café")
            .build();

        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();
        assert_eq!(
            raw.get(Source::Header, "x-note"),
            Some(&RawValue::from("caf\u{c3}\u{a9}"))
        );
    }

    #[test]
    fn test_json_body_keys() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri("/create")
            .json(&json!({"name": "Foo", "price": 4.2, "tax": null}))
            .build();

        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();

        assert_eq!(raw.get(Source::Body, "name"), Some(&RawValue::Json(json!("Foo"))));
        assert_eq!(raw.get(Source::Body, "price"), Some(&RawValue::Json(json!(4.2))));
        assert_eq!(raw.get(Source::Body, "tax"), Some(&RawValue::Json(json!(null))));
    }

    #[test]
    fn test_json_body_without_content_type() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .body(r#"{"name": "Foo"}"#)
            .build();
        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();
        assert!(raw.contains(Source::Body, "name"));
    }

    #[test]
    fn test_form_body() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .header("content-type", "application/x-www-form-urlencoded")
            .body("username=dave&password=secret+word")
            .build();

        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();
        assert_eq!(
            raw.get(Source::Form, "password"),
            Some(&RawValue::from("secret word"))
        );
        assert!(!raw.contains(Source::Body, "username"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .header("content-type", "application/json")
            .body(r#"{"name": "#)
            .build();

        let err = raw_request(&ctx, &ExtractOptions::default()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
    }

    #[test]
    fn test_non_object_json_rejected() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .json(&json!([1, 2, 3]))
            .build();

        let err = raw_request(&ctx, &ExtractOptions::default()).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_body_limit() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .json(&json!({"name": "x".repeat(64)}))
            .build();
        let options = ExtractOptions {
            max_body_bytes: 16,
            ..ExtractOptions::default()
        };

        let err = raw_request(&ctx, &options).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_unknown_content_type() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .header("content-type", "text/plain")
            .body("hello")
            .build();

        let raw = raw_request(&ctx, &ExtractOptions::default()).unwrap();
        assert!(raw.is_empty() || raw.iter().all(|(source, _, _)| source == Source::Header));

        let strict = ExtractOptions {
            strict_content_type: true,
            ..ExtractOptions::default()
        };
        let err = raw_request(&ctx, &strict).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_vendor_json_media_type() {
        assert_eq!(BodyKind::of(Some("application/problem+json")), BodyKind::Json);
        assert_eq!(BodyKind::of(Some(FORM)), BodyKind::Form);
        assert_eq!(BodyKind::of(Some("multipart/form-data")), BodyKind::Other);
    }

    #[test]
    fn test_from_request_uses_defaults() {
        let ctx = ExtractionContextBuilder::new()
            .uri("/items/?item-query=fixedquery")
            .build();
        let raw = RawRequest::from_request(&ctx).unwrap();
        assert_eq!(
            raw.get(Source::Query, "item-query").and_then(RawValue::as_text),
            Some("fixedquery")
        );
    }
}
