//! Response builders.
//!
//! | Builder | Content-Type | Description |
//! |---------|--------------|-------------|
//! | [`JsonResponse`] | `application/json` | JSON serialized response |
//! | [`TextResponse`] | `text/plain` | Plain text |
//!
//! Building never panics: a body that fails to serialize becomes a plain
//! `500 Internal Server Error`.
//!
//! # Example
//!
//! ```rust
//! use thales_extract::response::{Detail, JsonResponse};
//! use http::StatusCode;
//!
//! let response = JsonResponse::new(Detail::new("Not Found"))
//!     .with_status(StatusCode::NOT_FOUND)
//!     .into_response();
//!
//! assert_eq!(response.status(), StatusCode::NOT_FOUND);
//! assert_eq!(response.body().as_ref(), br#"{"detail":"Not Found"}"#);
//! ```

use bytes::Bytes;
use http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;
use tracing::error;

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// The `{"detail": ...}` envelope used by error responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detail<T> {
    /// The error payload.
    pub detail: T,
}

impl<T: Serialize> Detail<T> {
    /// Wraps `detail`.
    pub fn new(detail: T) -> Self {
        Self { detail }
    }
}

/// JSON response builder.
///
/// ```rust
/// use thales_extract::response::JsonResponse;
/// use serde_json::json;
///
/// let response = JsonResponse::created(json!({"name": "Foo"}));
/// assert_eq!(response.status(), http::StatusCode::CREATED);
/// ```
#[derive(Debug)]
pub struct JsonResponse<T> {
    data: T,
    status: StatusCode,
}

impl<T: Serialize> JsonResponse<T> {
    /// Creates a new JSON response with status 200 OK.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Creates a JSON response with status 201 Created.
    #[must_use]
    pub fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns a reference to the data.
    #[must_use]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        match serde_json::to_vec(&self.data) {
            Ok(body) => build(self.status, APPLICATION_JSON, Bytes::from(body)),
            Err(err) => {
                error!(error = %err, "failed to serialize response body");
                internal_error()
            }
        }
    }
}

/// Plain text response builder.
#[derive(Debug, Clone)]
pub struct TextResponse {
    body: String,
    status: StatusCode,
}

impl TextResponse {
    /// Creates a new text response with status 200 OK.
    #[must_use]
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            status: StatusCode::OK,
        }
    }

    /// Sets a custom status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Builds the HTTP response.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        build(self.status, TEXT_PLAIN, Bytes::from(self.body))
    }
}

/// A bare `500 Internal Server Error`.
#[must_use]
pub fn internal_error() -> Response<Bytes> {
    build(
        StatusCode::INTERNAL_SERVER_ERROR,
        TEXT_PLAIN,
        Bytes::from_static(b"Internal Server Error"),
    )
}

fn build(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Bytes> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::Error as _;
    use serde_json::json;

    #[test]
    fn test_json_response() {
        let response = JsonResponse::new(json!({"item_id": 5})).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_JSON
        );
        assert_eq!(response.body().as_ref(), br#"{"item_id":5}"#);
    }

    #[test]
    fn test_json_response_status() {
        let response = JsonResponse::created("Test");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.data(), &"Test");
        assert_eq!(response.into_response().body().as_ref(), br#""Test""#);
    }

    #[test]
    fn test_detail_envelope() {
        let response = JsonResponse::new(Detail::new("Method Not Allowed"))
            .with_status(StatusCode::METHOD_NOT_ALLOWED)
            .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.body().as_ref(),
            br#"{"detail":"Method Not Allowed"}"#
        );
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("boom"))
        }
    }

    #[test]
    fn test_serialization_failure_becomes_500() {
        let response = JsonResponse::new(Unserializable).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_text_response() {
        let response = TextResponse::new("hello")
            .with_status(StatusCode::ACCEPTED)
            .into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), TEXT_PLAIN);
    }
}
