//! Request dispatch.
//!
//! [`TutorialApp`] owns the route table and the endpoint registry. Both are
//! built once and never change, so one app can serve any number of threads.

use std::collections::HashMap;
use std::time::Instant;

use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use thales_config::{ConfigError, ConfigLoader, ThalesConfig};
use thales_core::{SchemaError, SchemaResult};
use thales_extract::response::{internal_error, Detail, JsonResponse};
use thales_extract::{validate_request, ExtractOptions, ExtractionContext, RequestRejection};
use thales_telemetry::{init_logging, log_request_complete, log_request_rejected, TelemetryError};
use tracing::{error, info};

use crate::handlers::{endpoints, Endpoint};
use crate::router::{RouteLookup, Router};

/// Errors raised while starting the app.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An endpoint schema is invalid.
    #[error("invalid endpoint schema: {0}")]
    Schema(#[from] SchemaError),
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The logging subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// The tutorial service.
///
/// ```rust
/// use bytes::Bytes;
/// use http::{Request, StatusCode};
/// use thales_config::ThalesConfig;
/// use thales_tutorial::TutorialApp;
///
/// let app = TutorialApp::new(&ThalesConfig::default()).unwrap();
///
/// let request = Request::get("/models/lenet").body(Bytes::new()).unwrap();
/// let response = app.handle(request);
///
/// assert_eq!(response.status(), StatusCode::OK);
/// assert_eq!(
///     response.body().as_ref(),
///     br#"{"model_name":"lenet","message":"LeCNN all the images"}"#
/// );
/// ```
#[derive(Debug)]
pub struct TutorialApp {
    router: Router,
    endpoints: HashMap<&'static str, Endpoint>,
    options: ExtractOptions,
}

impl TutorialApp {
    /// Builds the app with the extraction settings of `config`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] among the endpoint schemas.
    pub fn new(config: &ThalesConfig) -> SchemaResult<Self> {
        Self::with_options(config.extract.to_options())
    }

    /// Builds the app with explicit extraction options.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] among the endpoint schemas.
    pub fn with_options(options: ExtractOptions) -> SchemaResult<Self> {
        let mut router = Router::new();
        let mut registry = HashMap::new();

        for endpoint in endpoints()? {
            router.add_route(endpoint.method().clone(), endpoint.path(), endpoint.operation_id());
            registry.insert(endpoint.operation_id(), endpoint);
        }

        Ok(Self {
            router,
            endpoints: registry,
            options,
        })
    }

    /// Loads configuration, installs logging and builds the app.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if configuration fails to load, a subscriber is
    /// already installed, or an endpoint schema is invalid.
    pub fn start(loader: ConfigLoader) -> Result<Self, AppError> {
        let config = loader.load()?;
        init_logging(&config.telemetry.to_log_config())?;

        let app = Self::new(&config)?;
        info!(
            service.name = %config.telemetry.service_name,
            environment = %config.telemetry.environment,
            routes = app.router.route_count(),
            "tutorial app ready"
        );
        Ok(app)
    }

    /// Extraction settings in effect.
    #[must_use]
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Looks up an endpoint by operation ID.
    #[must_use]
    pub fn endpoint(&self, operation_id: &str) -> Option<&Endpoint> {
        self.endpoints.get(operation_id)
    }

    /// Registered operation IDs, in registration order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.router.operation_ids()
    }

    /// Handles one request.
    ///
    /// - unknown path: 404 `{"detail":"Not Found"}`
    /// - known path, wrong method: 405 `{"detail":"Method Not Allowed"}`
    /// - unreadable body: 400, 413 or 415 with `{"code","message"}`
    /// - invalid input: 422 with one `detail` record per failure
    /// - otherwise: 200 with the handler's JSON body
    pub fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        let started = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let response = self.dispatch(request);

        let duration_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        log_request_complete!(method, path, response.status().as_u16(), duration_us);
        response
    }

    fn dispatch(&self, request: Request<Bytes>) -> Response<Bytes> {
        let found = match self.router.lookup(request.method(), request.uri().path()) {
            RouteLookup::Found(found) => found,
            RouteLookup::MethodNotAllowed(allowed) => return method_not_allowed(&allowed),
            RouteLookup::NotFound => return not_found(),
        };

        let operation_id = found.operation_id();
        let Some(endpoint) = self.endpoints.get(operation_id) else {
            error!(handler = operation_id, "route has no registered endpoint");
            return internal_error();
        };

        let ctx = ExtractionContext::from_request(request, found.into_params());

        match validate_request(&ctx, endpoint.schema(), &self.options) {
            Ok(input) => match endpoint.call(&input) {
                Ok(body) => JsonResponse::new(body).into_response(),
                Err(err) => {
                    error!(handler = operation_id, error = %err, "handler failed");
                    internal_error()
                }
            },
            Err(rejection) => {
                let failures = match &rejection {
                    RequestRejection::Validation(errors) => errors.len(),
                    RequestRejection::Extraction(_) => 0,
                };
                log_request_rejected!(operation_id, rejection.status_code().as_u16(), failures);
                rejection.into_response()
            }
        }
    }
}

fn not_found() -> Response<Bytes> {
    JsonResponse::new(Detail::new("Not Found"))
        .with_status(StatusCode::NOT_FOUND)
        .into_response()
}

fn method_not_allowed(allowed: &[Method]) -> Response<Bytes> {
    let mut response = JsonResponse::new(Detail::new("Method Not Allowed"))
        .with_status(StatusCode::METHOD_NOT_ALLOWED)
        .into_response();

    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use thales_config::ExtractConfig;

    fn app() -> TutorialApp {
        TutorialApp::new(&ThalesConfig::default()).unwrap()
    }

    fn get(uri: &str) -> Request<Bytes> {
        Request::get(uri).body(Bytes::new()).unwrap()
    }

    #[test]
    fn test_registry_matches_router() {
        let app = app();
        let ids: Vec<_> = app.operation_ids().collect();
        assert_eq!(ids.len(), 10);
        for id in ids {
            assert!(app.endpoint(id).is_some(), "{id} has no endpoint");
        }
    }

    #[test]
    fn test_options_follow_config() {
        let config = ThalesConfig::builder()
            .extract(ExtractConfig {
                max_body_bytes: 16,
                strict_content_type: true,
            })
            .build();
        let app = TutorialApp::new(&config).unwrap();
        assert_eq!(app.options().max_body_bytes, 16);
        assert!(app.options().strict_content_type);
    }

    #[test]
    fn test_root() {
        let response = app().handle(get("/"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), br#""Test""#);
    }

    #[test]
    fn test_not_found() {
        let response = app().handle(get("/nowhere"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.body().as_ref(), br#"{"detail":"Not Found"}"#);
    }

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let request = Request::delete("/create").body(Bytes::new()).unwrap();
        let response = app().handle(request);
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
        assert_eq!(response.body().as_ref(), br#"{"detail":"Method Not Allowed"}"#);
    }

    #[test]
    fn test_start_with_logging_disabled() {
        let loader = ConfigLoader::new()
            .with_string(r#"{"telemetry": {"logging": {"enabled": false}}}"#, "json")
            .unwrap();
        let app = TutorialApp::start(loader).unwrap();
        assert!(app.endpoint("read_item").is_some());
    }

    #[test]
    fn test_start_propagates_config_errors() {
        let loader = ConfigLoader::new()
            .with_string(r#"{"extract": {"max_body_bytes": 0}}"#, "json")
            .unwrap();
        assert!(matches!(TutorialApp::start(loader), Err(AppError::Config(_))));
    }
}
