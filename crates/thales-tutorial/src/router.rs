//! Request routing and path matching.
//!
//! Maps a method and path to an operation ID using `{param}` path templates.
//! When several templates match a path, the one with more literal segments
//! wins, so `/items/me` beats `/items/{item_id}` regardless of
//! registration order.
//!
//! # Example
//!
//! ```rust
//! use thales_tutorial::router::{RouteLookup, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/items/{item_id}", "read_item");
//!
//! let RouteLookup::Found(found) = router.lookup(&Method::GET, "/items/5") else {
//!     panic!("expected a match");
//! };
//! assert_eq!(found.operation_id(), "read_item");
//! assert_eq!(found.params().get("item_id"), Some("5"));
//!
//! assert!(matches!(
//!     router.lookup(&Method::POST, "/items/5"),
//!     RouteLookup::MethodNotAllowed(_)
//! ));
//! assert!(matches!(router.lookup(&Method::GET, "/users"), RouteLookup::NotFound));
//! ```

use http::Method;
use thales_extract::Params;

/// A matched route with extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    operation_id: &'a str,
    params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Returns the operation ID for this route.
    #[must_use]
    pub fn operation_id(&self) -> &'a str {
        self.operation_id
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Consumes the match and returns the parameters.
    #[must_use]
    pub fn into_params(self) -> Params {
        self.params
    }
}

/// Outcome of [`Router::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteLookup<'a> {
    /// A route matched both path and method.
    Found(RouteMatch<'a>),
    /// The path matched, but only for these methods.
    MethodNotAllowed(Vec<Method>),
    /// No route matched the path.
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    segments: Vec<PathSegment>,
    operation_id: String,
}

impl Route {
    fn new(method: Method, pattern: &str, operation_id: impl Into<String>) -> Self {
        Self {
            method,
            segments: Self::parse_segments(pattern),
            operation_id: operation_id.into(),
        }
    }

    fn parse_segments(pattern: &str) -> Vec<PathSegment> {
        split_path(pattern)
            .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => PathSegment::Param(name.to_string()),
                None => PathSegment::Literal(s.to_string()),
            })
            .collect()
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, PathSegment::Literal(_)))
            .count()
    }

    fn match_path(&self, path_segments: &[&str]) -> Option<Params> {
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();

        for (pattern, actual) in self.segments.iter().zip(path_segments) {
            match pattern {
                PathSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    let value = urlencoding::decode(actual)
                        .map_or_else(|_| (*actual).to_string(), |v| v.into_owned());
                    params.push(name.clone(), value);
                }
            }
        }

        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Method and path template router.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Adds a route.
    ///
    /// `pattern` uses `{name}` for parameter segments; empty segments are
    /// ignored, so `/items/` and `/items` are the same template.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: impl AsRef<str>,
        operation_id: impl Into<String>,
    ) {
        self.routes
            .push(Route::new(method, pattern.as_ref(), operation_id));
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Checks if an operation ID is registered.
    #[must_use]
    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.routes.iter().any(|r| r.operation_id == operation_id)
    }

    /// Returns all registered operation IDs in registration order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.operation_id.as_str())
    }

    /// Resolves a request to a route.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> RouteLookup<'_> {
        let segments: Vec<&str> = split_path(path).collect();

        let mut best: Option<(usize, &Route, Params)> = None;
        let mut allowed = Vec::new();

        for route in &self.routes {
            let Some(params) = route.match_path(&segments) else {
                continue;
            };
            if route.method != *method {
                if !allowed.contains(&route.method) {
                    allowed.push(route.method.clone());
                }
                continue;
            }
            let score = route.literal_count();
            if best.as_ref().map_or(true, |(s, _, _)| score > *s) {
                best = Some((score, route, params));
            }
        }

        match best {
            Some((_, route, params)) => RouteLookup::Found(RouteMatch {
                operation_id: &route.operation_id,
                params,
            }),
            None if !allowed.is_empty() => RouteLookup::MethodNotAllowed(allowed),
            None => RouteLookup::NotFound,
        }
    }
}
