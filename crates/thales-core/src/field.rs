//! Field declarations.
//!
//! A [`FieldSpec`] describes one expected input: where it comes from, what
//! it should coerce to, whether it is required, and which constraints the
//! coerced value must satisfy.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Constraint, Schema, Value};

/// Where a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Path parameters (e.g. `/items/{item_id}`).
    Path,
    /// Query string parameters.
    Query,
    /// HTTP headers.
    Header,
    /// URL-encoded form fields.
    Form,
    /// Top-level keys of a JSON object body.
    Body,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Header => write!(f, "header"),
            Self::Form => write!(f, "form"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// A closed set of string members.
///
/// Membership is exact and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSpec {
    name: String,
    members: Vec<String>,
}

impl EnumSpec {
    /// Creates an enum with the given members, in declaration order.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the enum name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the members in declaration order.
    #[must_use]
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Returns true if `candidate` is exactly one of the members.
    #[must_use]
    pub fn contains(&self, candidate: &str) -> bool {
        self.members.iter().any(|m| m == candidate)
    }
}

/// The type a raw input is coerced to.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    /// Free-form string.
    String,
    /// 64-bit signed integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean, accepting the usual textual tokens.
    Boolean,
    /// One of a closed set of strings.
    Enum(EnumSpec),
    /// A JSON object validated against a nested schema.
    Object(Arc<Schema>),
    /// The inner type, or an explicit JSON `null`.
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for [`FieldType::Enum`].
    pub fn enumeration<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(EnumSpec::new(name, members))
    }

    /// Shorthand for [`FieldType::Object`].
    #[must_use]
    pub fn object(schema: impl Into<Arc<Schema>>) -> Self {
        Self::Object(schema.into())
    }

    /// Wraps `inner` in [`FieldType::Optional`].
    #[must_use]
    pub fn optional(inner: FieldType) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Returns true if this type admits `null`.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns the type with any optional wrappers removed.
    #[must_use]
    pub fn base(&self) -> &FieldType {
        match self {
            Self::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// Returns true for integer and float types.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self.base(), Self::Integer | Self::Float)
    }

    /// Returns true for string and enum types.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self.base(), Self::String | Self::Enum(_))
    }

    /// Normalizes a default value to this type, or returns `None` if the
    /// value cannot inhabit it.
    pub(crate) fn normalize_default(&self, value: &Value) -> Option<Value> {
        match (self, value) {
            (Self::Optional(_), Value::Null) => Some(Value::Null),
            (Self::Optional(inner), other) => inner.normalize_default(other),
            (Self::String, Value::Str(_))
            | (Self::Integer, Value::Int(_))
            | (Self::Boolean, Value::Bool(_))
            | (Self::Object(_), Value::Object(_)) => Some(value.clone()),
            (Self::Float, Value::Float(f)) if f.is_finite() => Some(value.clone()),
            (Self::Float, Value::Int(i)) => Some(Value::Float(*i as f64)),
            (Self::Enum(spec), Value::Str(s) | Value::Enum(s)) if spec.contains(s) => {
                Some(Value::Enum(s.clone()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Integer => write!(f, "integer"),
            Self::Float => write!(f, "float"),
            Self::Boolean => write!(f, "boolean"),
            Self::Enum(spec) => write!(f, "enum {}", spec.name()),
            Self::Object(schema) => write!(f, "object {}", schema.name()),
            Self::Optional(inner) => write!(f, "optional {inner}"),
        }
    }
}

/// Declaration of one expected input value.
///
/// Built with chained methods and handed to a
/// [`SchemaBuilder`](crate::SchemaBuilder), which checks the declaration
/// as a whole.
///
/// ```rust
/// use thales_core::{FieldSpec, FieldType};
///
/// let size = FieldSpec::query("size", FieldType::Float).gt(0.0).lt(10.5);
/// assert!(size.is_required());
///
/// let skip = FieldSpec::query("skip", FieldType::Integer).default(0);
/// assert!(!skip.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    source: Source,
    name: String,
    alias: Option<String>,
    expected_type: FieldType,
    required: Option<bool>,
    default: Option<Value>,
    constraints: Vec<Constraint>,
    deprecated: bool,
    title: Option<String>,
    description: Option<String>,
}

impl FieldSpec {
    /// Declares a field read from `source`.
    pub fn new(source: Source, name: impl Into<String>, expected_type: FieldType) -> Self {
        Self {
            source,
            name: name.into(),
            alias: None,
            expected_type,
            required: None,
            default: None,
            constraints: Vec::new(),
            deprecated: false,
            title: None,
            description: None,
        }
    }

    /// Declares a path parameter.
    pub fn path(name: impl Into<String>, expected_type: FieldType) -> Self {
        Self::new(Source::Path, name, expected_type)
    }

    /// Declares a query parameter.
    pub fn query(name: impl Into<String>, expected_type: FieldType) -> Self {
        Self::new(Source::Query, name, expected_type)
    }

    /// Declares a header.
    pub fn header(name: impl Into<String>, expected_type: FieldType) -> Self {
        Self::new(Source::Header, name, expected_type)
    }

    /// Declares a form field.
    pub fn form(name: impl Into<String>, expected_type: FieldType) -> Self {
        Self::new(Source::Form, name, expected_type)
    }

    /// Declares a key of the JSON body.
    pub fn body(name: impl Into<String>, expected_type: FieldType) -> Self {
        Self::new(Source::Body, name, expected_type)
    }

    /// Reads the value under `alias` instead of the field name.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Marks the field as required.
    ///
    /// Combining this with [`default`](Self::default) is rejected when the
    /// schema is built.
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = Some(true);
        self
    }

    /// Marks the field as optional; absent values become [`Value::Null`].
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = Some(false);
        self
    }

    /// Sets the value substituted when the input is absent.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Appends a constraint. Constraints are checked in declaration order.
    #[must_use]
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds an exclusive lower bound.
    #[must_use]
    pub fn gt(self, limit: f64) -> Self {
        self.constraint(Constraint::Gt(limit))
    }

    /// Adds an inclusive lower bound.
    #[must_use]
    pub fn ge(self, limit: f64) -> Self {
        self.constraint(Constraint::Ge(limit))
    }

    /// Adds an exclusive upper bound.
    #[must_use]
    pub fn lt(self, limit: f64) -> Self {
        self.constraint(Constraint::Lt(limit))
    }

    /// Adds an inclusive upper bound.
    #[must_use]
    pub fn le(self, limit: f64) -> Self {
        self.constraint(Constraint::Le(limit))
    }

    /// Adds a minimum length in characters.
    #[must_use]
    pub fn min_length(self, limit: usize) -> Self {
        self.constraint(Constraint::MinLength(limit))
    }

    /// Adds a maximum length in characters.
    #[must_use]
    pub fn max_length(self, limit: usize) -> Self {
        self.constraint(Constraint::MaxLength(limit))
    }

    /// Adds a regular expression the value must match.
    #[must_use]
    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.constraint(Constraint::Pattern(pattern.into()))
    }

    /// Restricts the value to the given strings.
    #[must_use]
    pub fn one_of<I, S>(self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint(Constraint::OneOf(members.into_iter().map(Into::into).collect()))
    }

    /// Flags the field as deprecated. Documentation only.
    #[must_use]
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Sets a human-readable title. Documentation only.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets a description. Documentation only.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the source category.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the field name (the key in the validated output).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the alias, if any.
    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the key looked up in the raw request.
    ///
    /// Headers without an alias have underscores replaced by hyphens and are
    /// compared case-insensitively, so `user_agent` reads `User-Agent`.
    #[must_use]
    pub fn lookup_key(&self) -> String {
        match (&self.alias, self.source) {
            (Some(alias), Source::Header) => alias.to_ascii_lowercase(),
            (Some(alias), _) => alias.clone(),
            (None, Source::Header) => self.name.replace('_', "-").to_ascii_lowercase(),
            (None, _) => self.name.clone(),
        }
    }

    /// Returns the expected type.
    #[must_use]
    pub fn expected_type(&self) -> &FieldType {
        &self.expected_type
    }

    /// Returns whether an absent value is a failure.
    ///
    /// Unless set explicitly, a field is required when it has no default and
    /// its type is not optional.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
            .unwrap_or(self.default.is_none() && !self.expected_type.is_optional())
    }

    pub(crate) fn explicitly_required(&self) -> bool {
        self.required == Some(true)
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub(crate) fn set_default(&mut self, value: Value) {
        self.default = Some(value);
    }

    /// Returns the constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Returns whether the field is flagged deprecated.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Returns the title, if any.
    #[must_use]
    pub fn title_text(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Path.to_string(), "path");
        assert_eq!(Source::Query.to_string(), "query");
        assert_eq!(Source::Header.to_string(), "header");
        assert_eq!(Source::Form.to_string(), "form");
        assert_eq!(Source::Body.to_string(), "body");
    }

    #[test]
    fn test_enum_membership_is_exact() {
        let models = EnumSpec::new("ModelName", ["alexnet", "resnet", "lenet"]);
        assert!(models.contains("lenet"));
        assert!(!models.contains("LeNet"));
        assert!(!models.contains("lenet "));
    }

    #[test]
    fn test_required_inference() {
        assert!(FieldSpec::query("needy", FieldType::String).is_required());
        assert!(!FieldSpec::query("skip", FieldType::Integer).default(0).is_required());
        assert!(!FieldSpec::query("limit", FieldType::optional(FieldType::Integer)).is_required());
        assert!(FieldSpec::query("limit", FieldType::optional(FieldType::Integer))
            .required()
            .is_required());
        assert!(!FieldSpec::query("q", FieldType::String).optional().is_required());
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(
            FieldSpec::query("q", FieldType::String).alias("item-query").lookup_key(),
            "item-query"
        );
        assert_eq!(
            FieldSpec::header("user_agent", FieldType::String).lookup_key(),
            "user-agent"
        );
        assert_eq!(
            FieldSpec::header("token", FieldType::String).alias("X-Token").lookup_key(),
            "x-token"
        );
        assert_eq!(FieldSpec::body("full_name", FieldType::String).lookup_key(), "full_name");
    }

    #[test]
    fn test_type_base_and_display() {
        let ty = FieldType::optional(FieldType::Float);
        assert_eq!(ty.base(), &FieldType::Float);
        assert!(ty.is_numeric());
        assert!(!ty.is_textual());
        assert_eq!(ty.to_string(), "optional float");
        assert_eq!(
            FieldType::enumeration("ModelName", ["a"]).to_string(),
            "enum ModelName"
        );
    }

    #[test]
    fn test_normalize_default() {
        assert_eq!(
            FieldType::Float.normalize_default(&Value::Int(1)),
            Some(Value::Float(1.0))
        );
        assert_eq!(
            FieldType::optional(FieldType::Integer).normalize_default(&Value::Null),
            Some(Value::Null)
        );
        assert_eq!(FieldType::Integer.normalize_default(&Value::from("1")), None);
        let models = FieldType::enumeration("ModelName", ["alexnet", "lenet"]);
        assert_eq!(
            models.normalize_default(&Value::from("lenet")),
            Some(Value::Enum("lenet".into()))
        );
        assert_eq!(models.normalize_default(&Value::from("resnet")), None);
    }
}
