//! # Thales Core
//!
//! Declarative request coercion and validation.
//!
//! A handler declares the inputs it expects as a [`Schema`] of
//! [`FieldSpec`]s. At request time the raw, untyped inputs are gathered into
//! a [`RawRequest`] and [`Schema::validate`] either returns every field
//! coerced to its declared type, or the complete list of failures.
//!
//! - [`FieldSpec`] / [`FieldType`] / [`Constraint`] - Field declarations
//! - [`Schema`] / [`SchemaBuilder`] - Ordered, checked set of declarations
//! - [`RawRequest`] / [`RawValue`] - Untyped request input
//! - [`Validated`] / [`Value`] - Coerced output
//! - [`ValidationErrors`] / [`Failure`] - Per-request failures
//! - [`SchemaError`] - Definition errors, raised when a schema is built
//!
//! ```rust
//! use thales_core::{FailureKind, FieldSpec, FieldType, RawRequest, Schema, Source};
//!
//! let schema = Schema::builder("read_items")
//!     .field(FieldSpec::path("item_id", FieldType::Integer).ge(0.0).le(1000.0))
//!     .field(FieldSpec::query("size", FieldType::Float).gt(0.0).lt(10.5))
//!     .build()
//!     .unwrap();
//!
//! let raw = RawRequest::new()
//!     .with(Source::Path, "item_id", "5")
//!     .with(Source::Query, "size", "10.5");
//!
//! let errors = schema.validate(&raw).unwrap_err();
//! assert_eq!(errors.kinds(), vec![FailureKind::ConstraintViolation]);
//! ```

#![doc(html_root_url = "https://docs.rs/thales-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod constraint;
mod error;
mod failure;
mod field;
mod raw;
mod schema;
mod value;

pub use coerce::parse_bool_token;
pub use constraint::Constraint;
pub use error::{SchemaError, SchemaResult};
pub use failure::{Failure, FailureKind, Validated, ValidationErrors, ValidationResult};
pub use field::{EnumSpec, FieldSpec, FieldType, Source};
pub use raw::RawRequest;
pub use schema::{Schema, SchemaBuilder};
pub use value::{RawValue, Value};
