//! Core extractor trait.

use crate::{ExtractionContext, ExtractionError};

/// Trait for types that can be extracted from an HTTP request.
///
/// # Implementing `FromRequest`
///
/// ```rust
/// use thales_extract::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
///
/// struct ApiVersion(u32);
///
/// impl FromRequest for ApiVersion {
///     fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
///         let version = ctx.header("x-api-version").unwrap_or("1");
///         version.parse().map(ApiVersion).map_err(|_| {
///             ExtractionError::invalid_type(
///                 ExtractionSource::Header,
///                 "x-api-version",
///                 "expected integer version",
///             )
///         })
///     }
/// }
/// ```
pub trait FromRequest: Sized {
    /// Extracts this type from the request context.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] if extraction fails.
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError>;
}

// Optional extraction: None if it fails
impl<T: FromRequest> FromRequest for Option<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(T::from_request(ctx).ok())
    }
}

impl<T: FromRequest> FromRequest for Result<T, ExtractionError> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(T::from_request(ctx))
    }
}

macro_rules! impl_from_request_for_tuple {
    ($($T:ident),*) => {
        impl<$($T: FromRequest),*> FromRequest for ($($T,)*) {
            fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
                Ok(($($T::from_request(ctx)?,)*))
            }
        }
    };
}

impl_from_request_for_tuple!(T1, T2);
impl_from_request_for_tuple!(T1, T2, T3);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionContextBuilder, ExtractionSource};
    use thales_core::{RawRequest, Source};

    struct RequestPath(String);

    impl FromRequest for RequestPath {
        fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
            Ok(RequestPath(ctx.path().to_string()))
        }
    }

    struct AlwaysFails;

    impl FromRequest for AlwaysFails {
        fn from_request(_ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
            Err(ExtractionError::deserialization_failed(
                ExtractionSource::Body,
                "nope",
            ))
        }
    }

    fn ctx() -> ExtractionContext {
        ExtractionContextBuilder::new()
            .uri("/users/items/foo?needy=yes")
            .path_param("item_id", "foo")
            .build()
    }

    #[test]
    fn test_option_extraction() {
        assert!(<Option<RequestPath>>::from_request(&ctx()).unwrap().is_some());
        assert!(<Option<AlwaysFails>>::from_request(&ctx()).unwrap().is_none());
    }

    #[test]
    fn test_result_extraction() {
        let inner = <Result<AlwaysFails, ExtractionError>>::from_request(&ctx()).unwrap();
        assert!(inner.is_err());
    }

    #[test]
    fn test_tuple_extraction() {
        let (path, raw) = <(RequestPath, RawRequest)>::from_request(&ctx()).unwrap();
        assert_eq!(path.0, "/users/items/foo");
        assert!(raw.contains(Source::Query, "needy"));
        assert!(raw.contains(Source::Path, "item_id"));
    }

    #[test]
    fn test_tuple_fails_on_any_member() {
        assert!(<(RequestPath, AlwaysFails)>::from_request(&ctx()).is_err());
    }
}
