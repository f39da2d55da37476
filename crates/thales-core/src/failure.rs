//! Validation failures and results.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::constraint::{quoted_choice, Rule};
use crate::{EnumSpec, Source, Value};

/// Outcome of validating one request: all fields coerced, or every failure
/// found. Never partial.
pub type ValidationResult = Result<Validated, ValidationErrors>;

/// Classification of a per-request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A required field was absent.
    MissingField,
    /// The raw value could not be coerced to the expected type.
    TypeMismatch,
    /// The raw value is not a member of the expected enum.
    InvalidEnumValue,
    /// The coerced value violated a declared constraint.
    ConstraintViolation,
}

impl FailureKind {
    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::TypeMismatch => "type_mismatch",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::ConstraintViolation => "constraint_violation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single field failure.
///
/// `field` is the wire key of the failing input; failures inside nested
/// objects use a dotted path such as `item.price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Where the failing field was read from.
    pub source: Source,
    /// The field key or dotted path.
    pub field: String,
    /// The failure kind.
    pub kind: FailureKind,
    /// Human-readable message.
    pub message: String,
    /// Name of the violated constraint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint: Option<String>,
    /// The constraint limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
    /// The offending input, when one was present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Failure {
    /// A required field was absent.
    #[must_use]
    pub fn missing(source: Source, field: impl Into<String>) -> Self {
        Self {
            source,
            field: field.into(),
            kind: FailureKind::MissingField,
            message: "Field required".to_string(),
            constraint: None,
            limit: None,
            value: None,
        }
    }

    /// The raw value could not be coerced.
    #[must_use]
    pub fn type_mismatch(
        source: Source,
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            source,
            field: field.into(),
            kind: FailureKind::TypeMismatch,
            message: message.into(),
            constraint: None,
            limit: None,
            value: Some(value.into()),
        }
    }

    /// The raw value is not an enum member.
    #[must_use]
    pub fn invalid_enum(
        source: Source,
        field: impl Into<String>,
        spec: &EnumSpec,
        value: impl Into<String>,
    ) -> Self {
        Self {
            source,
            field: field.into(),
            kind: FailureKind::InvalidEnumValue,
            message: format!("Input should be {}", quoted_choice(spec.members())),
            constraint: None,
            limit: None,
            value: Some(value.into()),
        }
    }

    pub(crate) fn violation(source: Source, field: impl Into<String>, rule: &Rule, value: &Value) -> Self {
        Self {
            source,
            field: field.into(),
            kind: FailureKind::ConstraintViolation,
            message: rule.message(),
            constraint: Some(rule.constraint().name().to_string()),
            limit: Some(rule.constraint().limit()),
            value: Some(value.render()),
        }
    }

    /// Re-roots a nested failure under `parent`, reported from `source`.
    #[must_use]
    pub(crate) fn nested_under(mut self, parent: &str, source: Source) -> Self {
        self.field = format!("{parent}.{}", self.field);
        self.source = source;
        self
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.source, self.field, self.message)
    }
}

/// Every failure found while validating a request, in field order.
///
/// Serializes as a JSON array of failure records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("request validation failed with {} error(s)", .failures.len())]
pub struct ValidationErrors {
    failures: Vec<Failure>,
}

impl ValidationErrors {
    pub(crate) fn new(failures: Vec<Failure>) -> Self {
        debug_assert!(!failures.is_empty());
        Self { failures }
    }

    /// Returns the failures in order.
    #[must_use]
    pub fn failures(&self) -> &[Failure] {
        &self.failures
    }

    /// Returns the number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Always false; an error carries at least one failure.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns the first failure for `field`.
    #[must_use]
    pub fn for_field(&self, field: &str) -> Option<&Failure> {
        self.failures.iter().find(|f| f.field == field)
    }

    /// Returns the failure kinds in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<FailureKind> {
        self.failures.iter().map(|f| f.kind).collect()
    }

    /// Iterates over the failures.
    pub fn iter(&self) -> std::slice::Iter<'_, Failure> {
        self.failures.iter()
    }

    /// Consumes the errors and returns the failures.
    #[must_use]
    pub fn into_vec(self) -> Vec<Failure> {
        self.failures
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Failure;
    type IntoIter = std::slice::Iter<'a, Failure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// Successfully coerced fields, keyed by field name in declared order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Validated {
    values: IndexMap<String, Value>,
}

impl Validated {
    pub(crate) fn new(values: IndexMap<String, Value>) -> Self {
        Self { values }
    }

    /// Returns the value of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns `field` as a string or enum member.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Returns `field` as an integer.
    #[must_use]
    pub fn get_i64(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_i64)
    }

    /// Returns `field` as a float.
    #[must_use]
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Returns `field` as a boolean.
    #[must_use]
    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    /// Returns `field` as a nested object.
    #[must_use]
    pub fn get_object(&self, field: &str) -> Option<&IndexMap<String, Value>> {
        self.get(field).and_then(Value::as_object)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the schema declared no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` pairs in declared order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.values.iter()
    }

    /// Converts to a JSON object.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Consumes the result and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Value> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_failure() {
        let failure = Failure::missing(Source::Query, "needy");
        assert_eq!(failure.kind, FailureKind::MissingField);
        assert_eq!(failure.message, "Field required");
        assert_eq!(failure.to_string(), "query needy: Field required");
    }

    #[test]
    fn test_invalid_enum_message() {
        let spec = EnumSpec::new("ModelName", ["alexnet", "resnet", "lenet"]);
        let failure = Failure::invalid_enum(Source::Path, "model_name", &spec, "vgg");
        assert_eq!(failure.message, "Input should be 'alexnet', 'resnet' or 'lenet'");
        assert_eq!(failure.value.as_deref(), Some("vgg"));
    }

    #[test]
    fn test_nested_under() {
        let failure = Failure::missing(Source::Body, "price").nested_under("item", Source::Body);
        assert_eq!(failure.field, "item.price");
    }

    #[test]
    fn test_failure_serialization_skips_empty_details() {
        let json = serde_json::to_value(Failure::missing(Source::Query, "q")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "source": "query",
                "field": "q",
                "kind": "missing_field",
                "message": "Field required"
            })
        );
    }

    #[test]
    fn test_validation_errors_accessors() {
        let errors = ValidationErrors::new(vec![
            Failure::missing(Source::Query, "q"),
            Failure::type_mismatch(Source::Path, "item_id", "Input should be a valid integer", "x"),
        ]);
        assert_eq!(errors.len(), 2);
        assert!(!errors.is_empty());
        assert_eq!(
            errors.kinds(),
            vec![FailureKind::MissingField, FailureKind::TypeMismatch]
        );
        assert_eq!(errors.for_field("item_id").unwrap().kind, FailureKind::TypeMismatch);
        assert!(errors.to_string().contains("2 error(s)"));
    }

    #[test]
    fn test_validated_accessors() {
        let mut values = IndexMap::new();
        values.insert("item_id".to_string(), Value::Int(5));
        values.insert("q".to_string(), Value::from("x"));
        values.insert("size".to_string(), Value::Float(5.0));
        let validated = Validated::new(values);

        assert_eq!(validated.get_i64("item_id"), Some(5));
        assert_eq!(validated.get_str("q"), Some("x"));
        assert_eq!(validated.get_f64("size"), Some(5.0));
        assert_eq!(validated.get_bool("q"), None);
        assert_eq!(
            validated.to_json(),
            serde_json::json!({"item_id": 5, "q": "x", "size": 5.0})
        );
    }
}
