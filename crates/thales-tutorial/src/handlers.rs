//! Tutorial endpoints.
//!
//! Each endpoint pairs the [`Schema`] describing its inputs with a plain
//! function that receives the validated values and echoes them back.
//! Handlers never see invalid input, so their only failure is a value the
//! schema guarantees but which is missing anyway.
//!
//! | Operation | Route |
//! |-----------|-------|
//! | `root` | `GET /` |
//! | `read_raw_item` | `GET /raw/items/{item_id}` |
//! | `read_item` | `GET /items/{item_id}` |
//! | `get_model` | `GET /models/{model_name}` |
//! | `read_checked_item` | `GET /checked/items/{item_id}` |
//! | `read_user_item` | `GET /users/items/{item_id}` |
//! | `read_items` | `GET /items/` |
//! | `create_item` | `POST /create` |
//! | `update_item` | `PUT /multi/items/{item_id}` |
//! | `update_embedded_item` | `PUT /embedded/items/{item_id}` |

use std::fmt;
use std::sync::Arc;

use http::Method;
use serde_json::{json, Map, Value as Json};
use thales_core::{FieldSpec, FieldType, Schema, SchemaResult, Validated, Value};

use crate::models::{self, ModelName};

/// Result of a handler call.
pub type HandlerResult = Result<Json, HandlerError>;

/// Handler signature: validated inputs in, JSON body out.
pub type Handler = fn(&Validated) -> HandlerResult;

/// Handler failure. Rendered as a plain 500.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// A validated field was missing or had an unexpected shape.
    UnexpectedValue {
        /// Field name.
        field: String,
    },
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedValue { field } => {
                write!(f, "validated field '{field}' has an unexpected value")
            }
        }
    }
}

impl std::error::Error for HandlerError {}

/// A route, its input schema and its handler.
#[derive(Clone)]
pub struct Endpoint {
    operation_id: &'static str,
    method: Method,
    path: &'static str,
    schema: Arc<Schema>,
    handler: Handler,
}

impl Endpoint {
    /// Creates an endpoint.
    pub fn new(
        operation_id: &'static str,
        method: Method,
        path: &'static str,
        schema: Schema,
        handler: Handler,
    ) -> Self {
        Self {
            operation_id,
            method,
            path,
            schema: Arc::new(schema),
            handler,
        }
    }

    /// Operation ID used for routing and logs.
    #[must_use]
    pub fn operation_id(&self) -> &'static str {
        self.operation_id
    }

    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path template.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Input schema.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Runs the handler.
    pub fn call(&self, input: &Validated) -> HandlerResult {
        (self.handler)(input)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("operation_id", &self.operation_id)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("schema", &self.schema.name())
            .finish_non_exhaustive()
    }
}

/// Builds every tutorial endpoint.
///
/// # Errors
///
/// Returns the first schema definition error.
pub fn endpoints() -> SchemaResult<Vec<Endpoint>> {
    Ok(vec![
        Endpoint::new("root", Method::GET, "/", Schema::builder("root").build()?, root),
        Endpoint::new(
            "read_raw_item",
            Method::GET,
            "/raw/items/{item_id}",
            Schema::builder("read_raw_item")
                .field(FieldSpec::path("item_id", FieldType::String))
                .build()?,
            echo,
        ),
        Endpoint::new(
            "read_item",
            Method::GET,
            "/items/{item_id}",
            Schema::builder("read_item")
                .field(FieldSpec::path("item_id", FieldType::Integer))
                .build()?,
            echo,
        ),
        Endpoint::new(
            "get_model",
            Method::GET,
            "/models/{model_name}",
            Schema::builder("get_model")
                .field(FieldSpec::path("model_name", ModelName::field_type()))
                .build()?,
            get_model,
        ),
        Endpoint::new(
            "read_checked_item",
            Method::GET,
            "/checked/items/{item_id}",
            Schema::builder("read_checked_item")
                .field(
                    FieldSpec::path("item_id", FieldType::Integer)
                        .title("The ID of the item to get")
                        .ge(0.0)
                        .le(1000.0),
                )
                .field(FieldSpec::query("q", FieldType::String))
                .field(FieldSpec::query("size", FieldType::Float).gt(0.0).lt(10.5))
                .build()?,
            read_checked_item,
        ),
        Endpoint::new(
            "read_user_item",
            Method::GET,
            "/users/items/{item_id}",
            Schema::builder("read_user_item")
                .field(FieldSpec::path("item_id", FieldType::String))
                .field(FieldSpec::query("needy", FieldType::String))
                .field(FieldSpec::query("skip", FieldType::Integer).default(0))
                .field(FieldSpec::query("limit", FieldType::optional(FieldType::Integer)))
                .build()?,
            echo,
        ),
        Endpoint::new(
            "read_items",
            Method::GET,
            "/items/",
            Schema::builder("read_items")
                .field(
                    FieldSpec::query("q", FieldType::optional(FieldType::String))
                        .alias("item-query")
                        .title("Query string")
                        .description(
                            "Query string for the items to search in the database that have a good match",
                        )
                        .min_length(3)
                        .max_length(50)
                        .pattern("^fixedquery$")
                        .deprecated(),
                )
                .build()?,
            read_items,
        ),
        Endpoint::new(
            "create_item",
            Method::POST,
            "/create",
            Schema::builder("create_item")
                .fields(models::item()?.fields().cloned())
                .build()?,
            create_item,
        ),
        Endpoint::new(
            "update_item",
            Method::PUT,
            "/multi/items/{item_id}",
            Schema::builder("update_item")
                .field(FieldSpec::path("item_id", FieldType::Integer))
                .field(FieldSpec::body("item", FieldType::object(models::item()?)))
                .field(FieldSpec::body("user", FieldType::object(models::user()?)))
                .field(FieldSpec::body("importance", FieldType::Integer))
                .build()?,
            echo,
        ),
        Endpoint::new(
            "update_embedded_item",
            Method::PUT,
            "/embedded/items/{item_id}",
            Schema::builder("update_embedded_item")
                .field(FieldSpec::path("item_id", FieldType::Integer))
                .field(FieldSpec::body("item", FieldType::object(models::constrained_item()?)))
                .build()?,
            echo,
        ),
    ])
}

fn root(_: &Validated) -> HandlerResult {
    Ok(json!("Test"))
}

/// Returns every validated field in declared order.
fn echo(input: &Validated) -> HandlerResult {
    Ok(input.to_json())
}

fn get_model(input: &Validated) -> HandlerResult {
    let model = input
        .get_str("model_name")
        .and_then(|name| name.parse::<ModelName>().ok())
        .ok_or_else(|| unexpected("model_name"))?;

    Ok(json!({
        "model_name": model.as_str(),
        "message": model.message(),
    }))
}

fn read_checked_item(input: &Validated) -> HandlerResult {
    let mut results = Map::new();
    results.insert("item_id".into(), field(input, "item_id")?);

    if let Some(q) = input.get_str("q").filter(|q| !q.is_empty()) {
        results.insert("q".into(), json!(q));
    }
    if let Some(size) = input.get_f64("size").filter(|s| *s != 0.0) {
        results.insert("size".into(), json!(size));
    }

    Ok(Json::Object(results))
}

fn read_items(input: &Validated) -> HandlerResult {
    let mut results = Map::new();
    results.insert(
        "items".into(),
        json!([{"item_id": "Foo"}, {"item_id": "Bar"}]),
    );

    if let Some(q) = input.get_str("q").filter(|q| !q.is_empty()) {
        results.insert("q".into(), json!(q));
    }

    Ok(Json::Object(results))
}

fn create_item(input: &Validated) -> HandlerResult {
    let Json::Object(mut item) = input.to_json() else {
        return Err(unexpected("item"));
    };

    let tax = input.get_f64("tax").filter(|t| *t != 0.0);
    if let Some(tax) = tax {
        let price = input.get_f64("price").ok_or_else(|| unexpected("price"))?;
        item.insert("price_with_tax".into(), json!(price + tax));
    }

    Ok(Json::Object(item))
}

fn field(input: &Validated, name: &str) -> Result<Json, HandlerError> {
    input.get(name).map(Value::to_json).ok_or_else(|| unexpected(name))
}

fn unexpected(field: &str) -> HandlerError {
    HandlerError::UnexpectedValue {
        field: field.to_string(),
    }
}
