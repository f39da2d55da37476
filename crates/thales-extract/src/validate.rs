//! Request validation against a schema.

use bytes::Bytes;
use http::{Response, StatusCode};
use thales_core::{Schema, Validated, ValidationErrors};
use tracing::debug;

use crate::response::{Detail, JsonResponse};
use crate::{raw_request, ExtractOptions, ExtractionContext, ExtractionError};

/// Why a request was turned away before reaching its handler.
#[derive(Debug, thiserror::Error)]
pub enum RequestRejection {
    /// The request could not be read into raw input.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The raw input did not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl RequestRejection {
    /// Returns the HTTP status for this rejection.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Extraction(err) => err.status_code(),
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    /// Renders the rejection.
    ///
    /// Validation failures render as `{"detail": [...]}` with one record per
    /// failure; extraction errors render as `{"code", "message"}`.
    #[must_use]
    pub fn into_response(self) -> Response<Bytes> {
        let status = self.status_code();
        match self {
            Self::Extraction(err) => JsonResponse::new(err.body())
                .with_status(status)
                .into_response(),
            Self::Validation(errors) => JsonResponse::new(Detail::new(errors))
                .with_status(status)
                .into_response(),
        }
    }
}

/// Collects the raw input of `ctx` and validates it against `schema`.
///
/// # Errors
///
/// Returns [`RequestRejection::Extraction`] when the request body cannot be
/// read, and [`RequestRejection::Validation`] with every field failure when
/// the input does not satisfy the schema.
pub fn validate_request(
    ctx: &ExtractionContext,
    schema: &Schema,
    options: &ExtractOptions,
) -> Result<Validated, RequestRejection> {
    let raw = raw_request(ctx, options)?;
    schema.validate(&raw).map_err(|errors| {
        debug!(
            schema = %schema.name(),
            failures = errors.len(),
            "request failed validation"
        );
        RequestRejection::Validation(errors)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExtractionContextBuilder;
    use http::Method;
    use thales_core::{FieldSpec, FieldType};

    fn schema() -> Schema {
        Schema::builder("read_user_item")
            .field(FieldSpec::path("item_id", FieldType::String))
            .field(FieldSpec::query("needy", FieldType::String))
            .field(FieldSpec::query("skip", FieldType::Integer).default(0))
            .build()
            .unwrap()
    }

    fn body_json(response: &Response<Bytes>) -> serde_json::Value {
        serde_json::from_slice(response.body()).unwrap()
    }

    #[test]
    fn test_valid_request() {
        let ctx = ExtractionContextBuilder::new()
            .uri("/users/items/foo?needy=sooooneedy&skip=3")
            .path_param("item_id", "foo")
            .build();

        let validated = validate_request(&ctx, &schema(), &ExtractOptions::default()).unwrap();
        assert_eq!(validated.get_str("needy"), Some("sooooneedy"));
        assert_eq!(validated.get_i64("skip"), Some(3));
    }

    #[test]
    fn test_validation_rejection_renders_detail() {
        let ctx = ExtractionContextBuilder::new()
            .uri("/users/items/foo?skip=abc")
            .path_param("item_id", "foo")
            .build();

        let rejection = validate_request(&ctx, &schema(), &ExtractOptions::default()).unwrap_err();
        assert!(matches!(rejection, RequestRejection::Validation(_)));

        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(&response);
        let detail = body["detail"].as_array().unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0]["field"], "needy");
        assert_eq!(detail[0]["kind"], "missing_field");
        assert_eq!(detail[1]["field"], "skip");
        assert_eq!(detail[1]["kind"], "type_mismatch");
        assert_eq!(detail[1]["value"], "abc");
    }

    #[test]
    fn test_extraction_rejection_renders_code() {
        let ctx = ExtractionContextBuilder::new()
            .method(Method::POST)
            .header("content-type", "application/json")
            .body("{not json")
            .build();

        let rejection = validate_request(&ctx, &schema(), &ExtractOptions::default()).unwrap_err();
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(&response)["code"], "DESERIALIZATION_FAILED");
    }
}
