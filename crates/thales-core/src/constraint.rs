//! Value constraints.
//!
//! [`Constraint`] is the declarative form attached to a
//! [`FieldSpec`](crate::FieldSpec). When a schema is built each constraint
//! is checked against the field type and compiled into a [`Rule`], which is
//! what the engine evaluates per request.

use regex::Regex;
use serde::Serialize;

use crate::{FieldSpec, FieldType, SchemaError, SchemaResult, Value};

/// A predicate a coerced value must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "constraint", content = "limit")]
pub enum Constraint {
    /// Strictly greater than.
    Gt(f64),
    /// Greater than or equal to.
    Ge(f64),
    /// Strictly less than.
    Lt(f64),
    /// Less than or equal to.
    Le(f64),
    /// At least this many characters.
    MinLength(usize),
    /// At most this many characters.
    MaxLength(usize),
    /// Must match this regular expression (unanchored search).
    Pattern(String),
    /// Must equal one of these strings.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Returns the constraint name as used in failure records.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Gt(_) => "gt",
            Self::Ge(_) => "ge",
            Self::Lt(_) => "lt",
            Self::Le(_) => "le",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Pattern(_) => "pattern",
            Self::OneOf(_) => "one_of",
        }
    }

    /// Renders the limit for failure records.
    #[must_use]
    pub fn limit(&self) -> String {
        match self {
            Self::Gt(n) | Self::Ge(n) | Self::Lt(n) | Self::Le(n) => n.to_string(),
            Self::MinLength(n) | Self::MaxLength(n) => n.to_string(),
            Self::Pattern(p) => p.clone(),
            Self::OneOf(members) => members.join(", "),
        }
    }

    fn applies_to(&self, ty: &FieldType) -> bool {
        match self {
            Self::Gt(_) | Self::Ge(_) | Self::Lt(_) | Self::Le(_) => ty.is_numeric(),
            Self::MinLength(_) | Self::MaxLength(_) | Self::Pattern(_) | Self::OneOf(_) => {
                ty.is_textual()
            }
        }
    }
}

/// A constraint checked and compiled against its field.
#[derive(Debug, Clone)]
pub(crate) struct Rule {
    constraint: Constraint,
    regex: Option<Regex>,
}

impl Rule {
    /// Compiles the constraints of `spec`, rejecting ones that cannot apply.
    pub(crate) fn compile_all(spec: &FieldSpec) -> SchemaResult<Vec<Rule>> {
        let rules = spec
            .constraints()
            .iter()
            .map(|constraint| Self::compile(spec, constraint))
            .collect::<SchemaResult<Vec<_>>>()?;
        check_bounds(spec)?;
        Ok(rules)
    }

    fn compile(spec: &FieldSpec, constraint: &Constraint) -> SchemaResult<Rule> {
        if !constraint.applies_to(spec.expected_type()) {
            return Err(SchemaError::ConstraintTypeMismatch {
                field: spec.name().to_string(),
                constraint: constraint.name(),
                field_type: spec.expected_type().to_string(),
            });
        }

        let regex = match constraint {
            Constraint::Gt(n) | Constraint::Ge(n) | Constraint::Lt(n) | Constraint::Le(n)
                if n.is_nan() =>
            {
                return Err(SchemaError::ConflictingBounds {
                    field: spec.name().to_string(),
                    reason: format!("{} bound is NaN", constraint.name()),
                });
            }
            Constraint::Pattern(pattern) => {
                Some(Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
                    field: spec.name().to_string(),
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?)
            }
            Constraint::OneOf(members) if members.is_empty() => {
                return Err(SchemaError::EmptyEnum {
                    name: spec.name().to_string(),
                });
            }
            _ => None,
        };

        Ok(Rule {
            constraint: constraint.clone(),
            regex,
        })
    }

    pub(crate) fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Returns true if `value` satisfies the rule.
    ///
    /// `Null` values always pass: constraints describe the inner type of an
    /// optional field.
    pub(crate) fn check(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match &self.constraint {
            Constraint::Gt(limit) => value.as_f64().is_some_and(|v| v > *limit),
            Constraint::Ge(limit) => value.as_f64().is_some_and(|v| v >= *limit),
            Constraint::Lt(limit) => value.as_f64().is_some_and(|v| v < *limit),
            Constraint::Le(limit) => value.as_f64().is_some_and(|v| v <= *limit),
            Constraint::MinLength(limit) => {
                value.as_str().is_some_and(|s| s.chars().count() >= *limit)
            }
            Constraint::MaxLength(limit) => {
                value.as_str().is_some_and(|s| s.chars().count() <= *limit)
            }
            Constraint::Pattern(_) => match (&self.regex, value.as_str()) {
                (Some(regex), Some(s)) => regex.is_match(s),
                _ => false,
            },
            Constraint::OneOf(members) => value
                .as_str()
                .is_some_and(|s| members.iter().any(|m| m == s)),
        }
    }

    /// Human-readable description of a violation.
    pub(crate) fn message(&self) -> String {
        match &self.constraint {
            Constraint::Gt(n) => format!("Input should be greater than {n}"),
            Constraint::Ge(n) => format!("Input should be greater than or equal to {n}"),
            Constraint::Lt(n) => format!("Input should be less than {n}"),
            Constraint::Le(n) => format!("Input should be less than or equal to {n}"),
            Constraint::MinLength(n) => {
                format!("String should have at least {n} {}", characters(*n))
            }
            Constraint::MaxLength(n) => {
                format!("String should have at most {n} {}", characters(*n))
            }
            Constraint::Pattern(p) => format!("String should match pattern '{p}'"),
            Constraint::OneOf(members) => format!("Input should be {}", quoted_choice(members)),
        }
    }
}

fn characters(n: usize) -> &'static str {
    if n == 1 {
        "character"
    } else {
        "characters"
    }
}

/// Renders `['a', 'b', 'c']` as `'a', 'b' or 'c'`.
pub(crate) fn quoted_choice(members: &[String]) -> String {
    match members {
        [] => String::new(),
        [only] => format!("'{only}'"),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|m| format!("'{m}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{head} or '{last}'")
        }
    }
}

// Lower bounds above upper bounds can never be satisfied.
fn check_bounds(spec: &FieldSpec) -> SchemaResult<()> {
    let mut lower: Option<(f64, bool)> = None;
    let mut upper: Option<(f64, bool)> = None;
    let mut min_len: Option<usize> = None;
    let mut max_len: Option<usize> = None;

    for constraint in spec.constraints() {
        match constraint {
            Constraint::Gt(n) => lower = tighter_lower(lower, (*n, true)),
            Constraint::Ge(n) => lower = tighter_lower(lower, (*n, false)),
            Constraint::Lt(n) => upper = tighter_upper(upper, (*n, true)),
            Constraint::Le(n) => upper = tighter_upper(upper, (*n, false)),
            Constraint::MinLength(n) => min_len = Some(min_len.map_or(*n, |m| m.max(*n))),
            Constraint::MaxLength(n) => max_len = Some(max_len.map_or(*n, |m| m.min(*n))),
            Constraint::Pattern(_) | Constraint::OneOf(_) => {}
        }
    }

    if let (Some((lo, lo_exclusive)), Some((hi, hi_exclusive))) = (lower, upper) {
        let empty = if lo_exclusive || hi_exclusive {
            lo >= hi
        } else {
            lo > hi
        };
        if empty {
            return Err(SchemaError::ConflictingBounds {
                field: spec.name().to_string(),
                reason: format!("lower bound {lo} excludes upper bound {hi}"),
            });
        }
    }

    if let (Some(min), Some(max)) = (min_len, max_len) {
        if min > max {
            return Err(SchemaError::ConflictingBounds {
                field: spec.name().to_string(),
                reason: format!("min_length {min} exceeds max_length {max}"),
            });
        }
    }

    Ok(())
}

fn tighter_lower(current: Option<(f64, bool)>, next: (f64, bool)) -> Option<(f64, bool)> {
    match current {
        Some(cur) if cur.0 > next.0 || (cur.0 == next.0 && cur.1) => Some(cur),
        _ => Some(next),
    }
}

fn tighter_upper(current: Option<(f64, bool)>, next: (f64, bool)) -> Option<(f64, bool)> {
    match current {
        Some(cur) if cur.0 < next.0 || (cur.0 == next.0 && cur.1) => Some(cur),
        _ => Some(next),
    }
}
