//! # Thales Extract
//!
//! HTTP adapter for the Thales validation engine.
//!
//! This crate turns an HTTP request into the untyped
//! [`RawRequest`](thales_core::RawRequest) the engine validates, runs a
//! [`Schema`](thales_core::Schema) over it, and renders the outcome.
//!
//! | Piece | Description |
//! |-------|-------------|
//! | [`ExtractionContext`] | Method, URI, headers, body and path [`Params`] of one request |
//! | [`raw_request`] | Collects path, query, header, form and JSON body values |
//! | [`validate_request`] | Collects and validates in one step |
//! | [`FromRequest`] | Seam for types built directly from a request |
//! | [`response`] | JSON and text response builders |
//!
//! ## Example
//!
//! ```rust
//! use thales_core::{FieldSpec, FieldType, Schema};
//! use thales_extract::{validate_request, ExtractOptions, ExtractionContextBuilder};
//!
//! let schema = Schema::builder("read_item")
//!     .field(FieldSpec::path("item_id", FieldType::Integer))
//!     .build()
//!     .unwrap();
//!
//! let ctx = ExtractionContextBuilder::new()
//!     .uri("/items/5")
//!     .path_param("item_id", "5")
//!     .build();
//!
//! let validated = validate_request(&ctx, &schema, &ExtractOptions::default()).unwrap();
//! assert_eq!(validated.get_i64("item_id"), Some(5));
//! ```
//!
//! ## Error Handling
//!
//! Transport problems (oversized or malformed bodies) are
//! [`ExtractionError`]s and map to 400/413/415. Field problems are the
//! engine's [`ValidationErrors`](thales_core::ValidationErrors) and map to
//! 422. Both are wrapped in [`RequestRejection`].

#![doc(html_root_url = "https://docs.rs/thales-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
mod extractor;
mod params;
mod raw;
pub mod response;
mod validate;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use error::{ExtractionError, ExtractionErrorBody, ExtractionSource};
pub use extractor::FromRequest;
pub use params::Params;
pub use raw::{raw_request, ExtractOptions, DEFAULT_MAX_BODY_BYTES};
pub use validate::{validate_request, RequestRejection};
