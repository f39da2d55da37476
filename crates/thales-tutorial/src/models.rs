//! Shared request models.
//!
//! The body models are nested [`Schema`]s so they can be embedded in any
//! endpoint as `FieldType::object(...)`.

use std::fmt;
use std::str::FromStr;

use thales_core::{FieldSpec, FieldType, Schema, SchemaResult};

/// The models served by `/models/{model_name}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelName {
    /// `alexnet`
    Alexnet,
    /// `resnet`
    Resnet,
    /// `lenet`
    Lenet,
}

impl ModelName {
    /// All members, in declaration order.
    pub const ALL: [Self; 3] = [Self::Alexnet, Self::Resnet, Self::Lenet];

    /// Wire name of the member.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alexnet => "alexnet",
            Self::Resnet => "resnet",
            Self::Lenet => "lenet",
        }
    }

    /// The message echoed for this model.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Alexnet => "Deep Learning FTW!",
            Self::Lenet => "LeCNN all the images",
            Self::Resnet => "Have some residuals",
        }
    }

    /// Field type accepting exactly the member names.
    #[must_use]
    pub fn field_type() -> FieldType {
        FieldType::enumeration("ModelName", Self::ALL.map(Self::as_str))
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown model name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModel(pub String);

impl fmt::Display for UnknownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model: {}", self.0)
    }
}

impl std::error::Error for UnknownModel {}

impl FromStr for ModelName {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

/// `Item`: `name`, optional `description`, `price`, optional `tax`.
pub fn item() -> SchemaResult<Schema> {
    Schema::builder("Item")
        .field(FieldSpec::body("name", FieldType::String))
        .field(FieldSpec::body("description", FieldType::optional(FieldType::String)))
        .field(FieldSpec::body("price", FieldType::Float))
        .field(FieldSpec::body("tax", FieldType::optional(FieldType::Float)))
        .build()
}

/// `Item` with a bounded description and a positive price.
pub fn constrained_item() -> SchemaResult<Schema> {
    Schema::builder("Item")
        .field(FieldSpec::body("name", FieldType::String))
        .field(
            FieldSpec::body("description", FieldType::optional(FieldType::String))
                .title("The description of the item")
                .max_length(300),
        )
        .field(
            FieldSpec::body("price", FieldType::Float)
                .gt(0.0)
                .description("The price must be greater than zero"),
        )
        .field(FieldSpec::body("tax", FieldType::optional(FieldType::Float)))
        .build()
}

/// `User`: `username` and optional `full_name`.
pub fn user() -> SchemaResult<Schema> {
    Schema::builder("User")
        .field(FieldSpec::body("username", FieldType::String))
        .field(FieldSpec::body("full_name", FieldType::optional(FieldType::String)))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use thales_core::{RawRequest, Source};

    #[test]
    fn test_model_name_round_trip() {
        for model in ModelName::ALL {
            assert_eq!(model.as_str().parse::<ModelName>(), Ok(model));
        }
        assert_eq!(
            "LeNet".parse::<ModelName>(),
            Err(UnknownModel("LeNet".to_string()))
        );
    }

    #[test]
    fn test_model_messages() {
        assert_eq!(ModelName::Alexnet.message(), "Deep Learning FTW!");
        assert_eq!(ModelName::Lenet.message(), "LeCNN all the images");
        assert_eq!(ModelName::Resnet.message(), "Have some residuals");
    }

    #[test]
    fn test_model_field_type_members() {
        let FieldType::Enum(spec) = ModelName::field_type() else {
            panic!("expected an enum type");
        };
        assert_eq!(spec.members(), ["alexnet", "resnet", "lenet"]);
    }

    #[test]
    fn test_schemas_build() {
        assert_eq!(item().unwrap().len(), 4);
        assert_eq!(constrained_item().unwrap().len(), 4);
        assert_eq!(user().unwrap().len(), 2);
    }

    #[test]
    fn test_constrained_item_rejects_zero_price() {
        let raw = RawRequest::new()
            .with(Source::Body, "name", serde_json::json!("Foo"))
            .with(Source::Body, "price", serde_json::json!(0));
        let errors = constrained_item().unwrap().validate(&raw).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.failures()[0].field, "price");
    }
}
