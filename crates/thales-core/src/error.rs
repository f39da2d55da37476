//! Schema definition errors.
//!
//! These are detected eagerly by [`SchemaBuilder::build`](crate::SchemaBuilder::build)
//! and indicate a programming mistake in the handler registration, never bad
//! client input. Per-request problems are reported as
//! [`Failure`](crate::Failure)s instead.

use thiserror::Error;

use crate::Source;

/// Result type alias using [`SchemaError`].
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while constructing a [`Schema`](crate::Schema).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field is explicitly required but also declares a default.
    #[error("field '{field}' is required but declares a default value")]
    RequiredWithDefault {
        /// The offending field name.
        field: String,
    },

    /// A constraint was attached to a field whose type it cannot apply to.
    #[error("constraint '{constraint}' cannot apply to field '{field}' of type {field_type}")]
    ConstraintTypeMismatch {
        /// The offending field name.
        field: String,
        /// The constraint name (e.g. `gt`, `min_length`).
        constraint: &'static str,
        /// Description of the field type.
        field_type: String,
    },

    /// A `pattern` constraint failed to compile.
    #[error("invalid pattern '{pattern}' on field '{field}': {reason}")]
    InvalidPattern {
        /// The offending field name.
        field: String,
        /// The pattern source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// Lower and upper bounds on a field cannot both be satisfied.
    #[error("conflicting bounds on field '{field}': {reason}")]
    ConflictingBounds {
        /// The offending field name.
        field: String,
        /// Which bounds conflict.
        reason: String,
    },

    /// An enum type or membership constraint declares no members.
    #[error("enum '{name}' declares no members")]
    EmptyEnum {
        /// Enum or field name.
        name: String,
    },

    /// Two fields share the same lookup key within one source.
    #[error("duplicate {origin} key '{key}'")]
    DuplicateKey {
        /// The source category.
        origin: Source,
        /// The duplicated lookup key.
        key: String,
    },

    /// Two fields share the same output name.
    #[error("duplicate field name '{field}'")]
    DuplicateField {
        /// The duplicated name.
        field: String,
    },

    /// A default value does not match the declared field type.
    #[error("default value of field '{field}' is not a valid {expected}")]
    DefaultTypeMismatch {
        /// The offending field name.
        field: String,
        /// Description of the expected type.
        expected: String,
    },

    /// A field name or alias is empty.
    #[error("field names and aliases must not be empty")]
    EmptyName,
}
