//! End-to-end extraction and validation tests.
//!
//! These build full HTTP requests, collect their raw input and run tutorial
//! style schemas over them.

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use serde_json::{json, Value as Json};
use thales_core::{FieldSpec, FieldType, Schema, Value};
use thales_extract::{
    validate_request, ExtractOptions, ExtractionContext, Params, RequestRejection,
};

fn item_schema() -> Schema {
    Schema::builder("Item")
        .field(FieldSpec::body("name", FieldType::String))
        .field(
            FieldSpec::body("description", FieldType::optional(FieldType::String))
                .max_length(300),
        )
        .field(FieldSpec::body("price", FieldType::Float).gt(0.0))
        .field(FieldSpec::body("tax", FieldType::optional(FieldType::Float)))
        .build()
        .unwrap()
}

fn context(method: Method, uri: &str, body: Option<Json>, params: &[(&str, &str)]) -> ExtractionContext {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Bytes::from(json.to_string())
        }
        None => Bytes::new(),
    };
    let request = builder.header("User-Agent", "tests/1.0").body(body).unwrap();

    let mut path_params = Params::new();
    for (name, value) in params {
        path_params.push(*name, *value);
    }
    ExtractionContext::from_request(request, path_params)
}

#[test]
fn embedded_body_validates() {
    let schema = Schema::builder("update_item")
        .field(FieldSpec::path("item_id", FieldType::Integer))
        .field(FieldSpec::body("item", FieldType::object(item_schema())))
        .build()
        .unwrap();

    let ctx = context(
        Method::PUT,
        "/embedded/items/5",
        Some(json!({"item": {"name": "Foo", "price": 35.4, "description": "A very nice Item"}})),
        &[("item_id", "5")],
    );

    let validated = validate_request(&ctx, &schema, &ExtractOptions::default()).unwrap();
    assert_eq!(
        validated.to_json(),
        json!({
            "item_id": 5,
            "item": {
                "name": "Foo",
                "description": "A very nice Item",
                "price": 35.4,
                "tax": null
            }
        })
    );
}

#[test]
fn embedded_body_reports_nested_paths() {
    let schema = Schema::builder("update_item")
        .field(FieldSpec::path("item_id", FieldType::Integer))
        .field(FieldSpec::body("item", FieldType::object(item_schema())))
        .build()
        .unwrap();

    let ctx = context(
        Method::PUT,
        "/embedded/items/abc",
        Some(json!({"item": {"name": "Foo", "price": 0, "description": "x".repeat(301)}})),
        &[("item_id", "abc")],
    );

    let Err(RequestRejection::Validation(errors)) =
        validate_request(&ctx, &schema, &ExtractOptions::default())
    else {
        panic!("expected validation failure");
    };
    let fields: Vec<_> = errors.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(fields, ["item_id", "item.description", "item.price"]);
}

#[test]
fn header_fields_read_by_converted_name() {
    let schema = Schema::builder("read_items")
        .field(FieldSpec::header("user_agent", FieldType::optional(FieldType::String)))
        .build()
        .unwrap();

    let ctx = context(Method::GET, "/items/", None, &[]);
    let validated = validate_request(&ctx, &schema, &ExtractOptions::default()).unwrap();
    assert_eq!(validated.get("user_agent"), Some(&Value::from("tests/1.0")));
}

#[test]
fn oversized_body_is_rejected_before_validation() {
    let schema = Schema::builder("create_item")
        .field(FieldSpec::body("name", FieldType::String))
        .build()
        .unwrap();

    let ctx = context(
        Method::POST,
        "/create",
        Some(json!({"name": "x".repeat(1024)})),
        &[],
    );
    let options = ExtractOptions {
        max_body_bytes: 128,
        ..ExtractOptions::default()
    };

    let rejection = validate_request(&ctx, &schema, &options).unwrap_err();
    assert_eq!(rejection.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(matches!(rejection, RequestRejection::Extraction(_)));
}

#[test]
fn missing_body_reports_missing_fields() {
    let schema = Schema::builder("create_item")
        .field(FieldSpec::body("name", FieldType::String))
        .field(FieldSpec::body("price", FieldType::Float))
        .build()
        .unwrap();

    let ctx = context(Method::POST, "/create", None, &[]);
    let rejection = validate_request(&ctx, &schema, &ExtractOptions::default()).unwrap_err();
    let response = rejection.into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Json = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(
        body,
        json!({
            "detail": [
                {"source": "body", "field": "name", "kind": "missing_field", "message": "Field required"},
                {"source": "body", "field": "price", "kind": "missing_field", "message": "Field required"}
            ]
        })
    );
}
