//! Raw and coerced values.
//!
//! [`RawValue`] is what arrives on the wire: plain text for path, query,
//! header and form inputs, or a JSON value for body fields. [`Value`] is the
//! strongly-typed result of coercion handed to handlers.

use indexmap::IndexMap;
use serde::Serialize;

/// An uncoerced input value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// Text from the path, query string, headers or a form body.
    Text(String),
    /// A JSON value taken from a request body.
    Json(serde_json::Value),
}

impl RawValue {
    /// Borrows this value as engine input.
    pub(crate) fn as_input(&self) -> Input<'_> {
        match self {
            Self::Text(text) => Input::Text(text),
            Self::Json(json) => Input::Json(json),
        }
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for RawValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Borrowed view of a raw input, shared by top-level and nested lookups.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Input<'a> {
    Text(&'a str),
    Json(&'a serde_json::Value),
}

impl<'a> Input<'a> {
    /// Folds a JSON string into plain text so scalars coerce alike.
    pub(crate) fn text_folded(self) -> Self {
        match self {
            Self::Json(serde_json::Value::String(text)) => Self::Text(text.as_str()),
            other => other,
        }
    }

    pub(crate) fn is_null(&self) -> bool {
        matches!(self, Self::Json(serde_json::Value::Null))
    }

    /// Short rendering of the input for failure records.
    pub(crate) fn render(&self) -> String {
        match self {
            Self::Text(text) => (*text).to_string(),
            Self::Json(serde_json::Value::String(text)) => text.clone(),
            Self::Json(json) => json.to_string(),
        }
    }
}

/// A coerced, strongly-typed value.
///
/// Serializes to the natural JSON representation: enum members and strings
/// as JSON strings, objects as JSON objects in declared field order.
///
/// ```rust
/// use thales_core::Value;
///
/// let value = Value::from(42);
/// assert_eq!(value.as_i64(), Some(42));
/// assert_eq!(serde_json::to_string(&value).unwrap(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent optional value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// String.
    Str(String),
    /// Member of a string enum.
    Enum(String),
    /// Nested object, keyed by field name in declared order.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the numeric value of an integer or float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the text of a string or enum member.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the enum member name, if this is an enum member.
    #[must_use]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Converts to a `serde_json::Value`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Str(s) | Self::Enum(s) => serde_json::Value::String(s.clone()),
            Self::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Returns a short name of the value kind, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Enum(_) => "enum",
            Self::Object(_) => "object",
        }
    }

    /// Renders the value the way failure records display it.
    pub(crate) fn render(&self) -> String {
        match self {
            Self::Str(s) | Self::Enum(s) => s.clone(),
            other => other.to_json().to_string(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
