//! Schemas: the immutable input declaration of one handler.

use std::collections::HashSet;

use crate::constraint::Rule;
use crate::{FieldSpec, FieldType, SchemaError, SchemaResult};

/// A field spec together with its compiled constraints.
#[derive(Debug, Clone)]
pub(crate) struct Field {
    pub(crate) spec: FieldSpec,
    pub(crate) key: String,
    pub(crate) rules: Vec<Rule>,
}

impl Field {
    /// Key of this field inside a nested JSON object: alias, else name.
    pub(crate) fn member_key(&self) -> &str {
        self.spec.alias_name().unwrap_or_else(|| self.spec.name())
    }
}

/// Ordered, immutable set of field declarations.
///
/// Built once (typically at handler registration) through
/// [`Schema::builder`] and then shared read-only, usually behind an `Arc`,
/// by every validation.
///
/// # Example
///
/// ```rust
/// use thales_core::{FieldSpec, FieldType, RawRequest, Schema, Source};
///
/// let schema = Schema::builder("read_user_item")
///     .field(FieldSpec::path("item_id", FieldType::String))
///     .field(FieldSpec::query("needy", FieldType::String))
///     .field(FieldSpec::query("skip", FieldType::Integer).default(0))
///     .field(FieldSpec::query("limit", FieldType::optional(FieldType::Integer)))
///     .build()
///     .unwrap();
///
/// let raw = RawRequest::new()
///     .with(Source::Path, "item_id", "foo")
///     .with(Source::Query, "needy", "sooooneedy");
///
/// let validated = schema.validate(&raw).unwrap();
/// assert_eq!(validated.get_i64("skip"), Some(0));
/// assert!(validated.get("limit").unwrap().is_null());
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    pub(crate) fields: Vec<Field>,
}

impl Schema {
    /// Starts a schema named `name` (used in logs and type descriptions).
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of declared fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the field specs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|f| &f.spec)
    }

    /// Returns the field spec named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|spec| spec.name() == name)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields().eq(other.fields())
    }
}

/// Builder for [`Schema`].
///
/// All declaration checks run in [`build`](Self::build); a schema that
/// builds can never produce a definition error at request time.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Appends several fields.
    #[must_use]
    pub fn fields(mut self, specs: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(specs);
        self
    }

    /// Checks every declaration and freezes the schema.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in field order.
    pub fn build(self) -> SchemaResult<Schema> {
        let mut keys = HashSet::new();
        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for mut spec in self.fields {
            if spec.name().is_empty() || spec.alias_name().is_some_and(str::is_empty) {
                return Err(SchemaError::EmptyName);
            }

            let key = spec.lookup_key();
            if !keys.insert((spec.source(), key.clone())) {
                return Err(SchemaError::DuplicateKey {
                    origin: spec.source(),
                    key,
                });
            }
            if !names.insert(spec.name().to_string()) {
                return Err(SchemaError::DuplicateField {
                    field: spec.name().to_string(),
                });
            }

            if let FieldType::Enum(enum_spec) = spec.expected_type().base() {
                if enum_spec.members().is_empty() {
                    return Err(SchemaError::EmptyEnum {
                        name: enum_spec.name().to_string(),
                    });
                }
            }

            if let Some(default) = spec.default_value() {
                if spec.explicitly_required() {
                    return Err(SchemaError::RequiredWithDefault {
                        field: spec.name().to_string(),
                    });
                }
                let normalized = spec
                    .expected_type()
                    .normalize_default(default)
                    .ok_or_else(|| SchemaError::DefaultTypeMismatch {
                        field: spec.name().to_string(),
                        expected: spec.expected_type().to_string(),
                    })?;
                spec.set_default(normalized);
            }

            let rules = Rule::compile_all(&spec)?;
            fields.push(Field { spec, key, rules });
        }

        Ok(Schema {
            name: self.name,
            fields,
        })
    }
}
