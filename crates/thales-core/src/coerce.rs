//! The coercion and validation engine.
//!
//! Every field is visited in declared order; failures are collected rather
//! than short-circuited so a client sees all of its mistakes at once. Per
//! field, at most one failure is recorded: coercion failures stop before
//! constraints, and only the first violated constraint is reported.

use indexmap::IndexMap;
use tracing::trace;

use crate::schema::Field;
use crate::value::Input;
use crate::{
    EnumSpec, Failure, FieldType, RawRequest, RawValue, Schema, Validated, ValidationErrors,
    ValidationResult, Value,
};

/// Why a present value could not be coerced.
enum Rejection<'s> {
    Mismatch(&'static str),
    NotInEnum(&'s EnumSpec),
    Nested(Vec<Failure>),
}

impl Schema {
    /// Coerces and validates `raw` against this schema.
    ///
    /// Pure and deterministic: the same `(schema, raw)` pair always yields
    /// the same result. Keys in `raw` that no field declares are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] holding every failure found.
    pub fn validate(&self, raw: &RawRequest) -> ValidationResult {
        let outcome = self.evaluate(
            |field| field.key.as_str(),
            |field| raw.get(field.spec.source(), &field.key).map(RawValue::as_input),
        );

        trace!(
            schema = %self.name(),
            fields = self.len(),
            failures = outcome.as_ref().err().map_or(0, Vec::len),
            "request validated"
        );

        outcome
            .map(Validated::new)
            .map_err(ValidationErrors::new)
    }

    /// Validates a JSON object against this schema as a nested model.
    ///
    /// Members are keyed by alias or name; field sources play no part here.
    fn evaluate_object(
        &self,
        object: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<IndexMap<String, Value>, Vec<Failure>> {
        self.evaluate(Field::member_key, |field| {
            object.get(field.member_key()).map(Input::Json)
        })
    }

    fn evaluate<'a>(
        &self,
        key_of: impl Fn(&Field) -> &str,
        lookup: impl Fn(&Field) -> Option<Input<'a>>,
    ) -> Result<IndexMap<String, Value>, Vec<Failure>> {
        let mut values = IndexMap::with_capacity(self.fields.len());
        let mut failures = Vec::new();

        for field in &self.fields {
            match resolve(field, key_of(field), lookup(field)) {
                Ok(value) => {
                    values.insert(field.spec.name().to_string(), value);
                }
                Err(mut field_failures) => failures.append(&mut field_failures),
            }
        }

        if failures.is_empty() {
            Ok(values)
        } else {
            Err(failures)
        }
    }
}

fn resolve(field: &Field, key: &str, input: Option<Input<'_>>) -> Result<Value, Vec<Failure>> {
    let source = field.spec.source();

    let Some(input) = input else {
        if let Some(default) = field.spec.default_value() {
            return Ok(default.clone());
        }
        if field.spec.is_required() {
            return Err(vec![Failure::missing(source, key)]);
        }
        return Ok(Value::Null);
    };

    let value = coerce(field.spec.expected_type(), input).map_err(|rejection| match rejection {
        Rejection::Mismatch(message) => {
            vec![Failure::type_mismatch(source, key, message, input.render())]
        }
        Rejection::NotInEnum(spec) => {
            vec![Failure::invalid_enum(source, key, spec, input.render())]
        }
        Rejection::Nested(failures) => failures
            .into_iter()
            .map(|failure| failure.nested_under(key, source))
            .collect(),
    })?;

    match field.rules.iter().find(|rule| !rule.check(&value)) {
        Some(rule) => Err(vec![Failure::violation(source, key, rule, &value)]),
        None => Ok(value),
    }
}

fn coerce<'s>(ty: &'s FieldType, input: Input<'_>) -> Result<Value, Rejection<'s>> {
    use serde_json::Value as Json;

    match ty {
        FieldType::Optional(inner) => {
            if input.is_null() {
                Ok(Value::Null)
            } else {
                coerce(inner, input)
            }
        }
        FieldType::String => match input.text_folded() {
            Input::Text(text) => Ok(Value::Str(text.to_string())),
            Input::Json(_) => Err(Rejection::Mismatch("Input should be a valid string")),
        },
        FieldType::Integer => coerce_integer(input).map(Value::Int),
        FieldType::Float => coerce_float(input).map(Value::Float),
        FieldType::Boolean => coerce_bool(input).map(Value::Bool),
        FieldType::Enum(spec) => match input.text_folded() {
            Input::Text(text) if spec.contains(text) => Ok(Value::Enum(text.to_string())),
            _ => Err(Rejection::NotInEnum(spec)),
        },
        FieldType::Object(schema) => {
            const NOT_OBJECT: &str =
                "Input should be a valid dictionary or object to extract fields from";
            let parsed;
            let object = match input {
                Input::Json(Json::Object(object)) => object,
                Input::Text(text) => {
                    parsed = serde_json::from_str::<Json>(text).ok();
                    match &parsed {
                        Some(Json::Object(object)) => object,
                        _ => return Err(Rejection::Mismatch(NOT_OBJECT)),
                    }
                }
                Input::Json(_) => return Err(Rejection::Mismatch(NOT_OBJECT)),
            };
            schema
                .evaluate_object(object)
                .map(Value::Object)
                .map_err(Rejection::Nested)
        }
    }
}

const NOT_INTEGER: &str = "Input should be a valid integer, unable to parse string as an integer";
const NOT_NUMBER: &str = "Input should be a valid number, unable to parse string as a number";
const NOT_BOOLEAN: &str = "Input should be a valid boolean, unable to interpret input";

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn coerce_integer(input: Input<'_>) -> Result<i64, Rejection<'static>> {
    use serde_json::Value as Json;

    match input.text_folded() {
        Input::Text(text) => text.parse().map_err(|_| Rejection::Mismatch(NOT_INTEGER)),
        Input::Json(Json::Number(number)) => {
            if let Some(i) = number.as_i64() {
                return Ok(i);
            }
            // Floats with no fractional part are accepted as integers.
            match number.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f as i64)
                }
                _ => Err(Rejection::Mismatch(
                    "Input should be a valid integer, got a number with a fractional part",
                )),
            }
        }
        Input::Json(_) => Err(Rejection::Mismatch("Input should be a valid integer")),
    }
}

fn coerce_float(input: Input<'_>) -> Result<f64, Rejection<'static>> {
    use serde_json::Value as Json;

    match input.text_folded() {
        // NaN and the infinities have no JSON form.
        Input::Text(text) => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or(Rejection::Mismatch(NOT_NUMBER)),
        Input::Json(Json::Number(number)) => number
            .as_f64()
            .ok_or(Rejection::Mismatch("Input should be a valid number")),
        Input::Json(_) => Err(Rejection::Mismatch("Input should be a valid number")),
    }
}

fn coerce_bool(input: Input<'_>) -> Result<bool, Rejection<'static>> {
    use serde_json::Value as Json;

    match input.text_folded() {
        Input::Text(text) => parse_bool_token(text).ok_or(Rejection::Mismatch(NOT_BOOLEAN)),
        Input::Json(Json::Bool(b)) => Ok(*b),
        Input::Json(Json::Number(number)) => match number.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(Rejection::Mismatch(NOT_BOOLEAN)),
        },
        Input::Json(_) => Err(Rejection::Mismatch(NOT_BOOLEAN)),
    }
}

/// Parses the accepted boolean tokens, ignoring ASCII case.
#[must_use]
pub fn parse_bool_token(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Some(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Some(false),
        _ => None,
    }
}
