//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] is what the raw-input collection and every
//! [`FromRequest`](crate::FromRequest) implementation read from.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Request, Uri};

use crate::Params;

/// Context providing access to all parts of an HTTP request.
///
/// # Example
///
/// ```rust
/// use thales_extract::{ExtractionContext, Params};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("item_id", "123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/items/123?q=foo"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.query_string(), Some("q=foo"));
/// assert_eq!(ctx.path_params().get("item_id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
        }
    }

    /// Creates a context from an HTTP request and the parameters its route
    /// captured.
    #[must_use]
    pub fn from_request(request: Request<Bytes>, path_params: Params) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.method, parts.uri, parts.headers, body, path_params)
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the media type of the body: the Content-Type without its
    /// parameters, lower-cased.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type().map(|ct| {
            ct.split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase()
        })
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Builder for constructing an `ExtractionContext`.
///
/// Unset method and URI default to `GET /`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI. Unparseable URIs are ignored.
    #[must_use]
    pub fn uri(mut self, uri: &str) -> Self {
        if let Ok(uri) = uri.parse() {
            self.uri = Some(uri);
        }
        self
    }

    /// Adds a single header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::try_from(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and its Content-Type.
    #[must_use]
    pub fn json(self, body: &serde_json::Value) -> Self {
        self.header("content-type", "application/json")
            .body(body.to_string())
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext {
            method: self.method.unwrap_or(Method::GET),
            uri: self.uri.unwrap_or_default(),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_context_creation() {
        let mut params = Params::new();
        params.push("item_id", "42");

        let ctx = ExtractionContext::new(
            Method::GET,
            Uri::from_static("/items/42?q=foo"),
            HeaderMap::new(),
            Bytes::from_static(b""),
            params,
        );

        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/items/42");
        assert_eq!(ctx.query_string(), Some("q=foo"));
        assert_eq!(ctx.path_params().get("item_id"), Some("42"));
        assert!(ctx.is_body_empty());
    }

    #[test]
    fn test_extraction_context_builder() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .uri("/create")
            .header("content-type", "application/json; charset=utf-8")
            .body(r#"{"name": "Foo"}"#)
            .path_param("version", "v1")
            .build();

        assert_eq!(ctx.method(), &Method::POST);
        assert_eq!(ctx.path(), "/create");
        assert_eq!(ctx.media_type().as_deref(), Some("application/json"));
        assert!(!ctx.is_body_empty());
        assert_eq!(ctx.path_params().get("version"), Some("v1"));
    }

    #[test]
    fn test_builder_defaults() {
        let ctx = ExtractionContextBuilder::new().uri("not a uri").build();
        assert_eq!(ctx.method(), &Method::GET);
        assert_eq!(ctx.path(), "/");
        assert_eq!(ctx.media_type(), None);
    }

    #[test]
    fn test_from_request() {
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/multi/items/5")
            .header("x-token", "abc")
            .body(Bytes::from_static(b"{}"))
            .unwrap();

        let mut params = Params::new();
        params.push("item_id", "5");
        let ctx = ExtractionContext::from_request(request, params);

        assert_eq!(ctx.method(), &Method::PUT);
        assert_eq!(ctx.header("x-token"), Some("abc"));
        assert_eq!(ctx.body().as_ref(), b"{}");
        assert_eq!(ctx.path_params().get("item_id"), Some("5"));
    }
}
