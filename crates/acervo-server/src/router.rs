//! Request routing and path matching.
//!
//! The router maps incoming method + path pairs to the operation ids of an
//! [`ApiContract`](acervo_core::ApiContract). Path templates use OpenAPI
//! `{name}` syntax and matching is first-wins in contract declaration
//! order, which is what lets the fixed `/tema/{rm}` template shadow the
//! generic `/{collection}/{rm}` one.
//!
//! # Example
//!
//! ```rust
//! use acervo_core::api_contract;
//! use acervo_server::Router;
//! use http::Method;
//!
//! let router = Router::from_contract(&api_contract());
//!
//! let matched = router.match_route(&Method::GET, "/livros/2023001").unwrap();
//! assert_eq!(matched.operation_id(), "listByOwner");
//! assert_eq!(matched.param("collection"), Some("livros"));
//! assert_eq!(matched.param("rm"), Some("2023001"));
//! ```

use std::collections::HashMap;

use http::Method;

use acervo_core::ApiContract;

/// A matched route with extracted path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The operation id from the contract
    operation_id: String,

    /// Extracted path parameters (e.g. `collection` from `/{collection}`)
    params: HashMap<String, String>,
}

impl RouteMatch {
    /// Creates a new route match.
    #[must_use]
    pub fn new(operation_id: impl Into<String>, params: HashMap<String, String>) -> Self {
        Self {
            operation_id: operation_id.into(),
            params,
        }
    }

    /// Returns the operation id for this route.
    #[must_use]
    pub fn operation_id(&self) -> &str {
        &self.operation_id
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns a specific path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    /// A literal segment (e.g. "tema")
    Literal(String),

    /// A parameter segment (e.g. "{collection}")
    Param(String),
}

/// A registered route.
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
        pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.starts_with('{') && s.ends_with('}') {
                    PathSegment::Param(s[1..s.len() - 1].to_string())
                } else {
                    PathSegment::Literal(s.to_string())
                }
            })
            .collect()
    }

    /// Matches this route against a concrete path, extracting parameters.
    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();

        for (pattern, actual) in self.segments.iter().zip(path_segments.iter()) {
            match pattern {
                PathSegment::Literal(expected) => {
                    if expected != *actual {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
            }
        }

        Some(params)
    }
}

/// HTTP request router built from an API contract.
///
/// Routes are tried in contract declaration order; the first match wins.
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

    /// Builds a router from a contract, one route per operation, in
    /// declaration order.
    #[must_use]
    pub fn from_contract(contract: &ApiContract) -> Self {
        let mut router = Self::new();
        for operation in contract.operations() {
            router.add_route(
                operation.method().clone(),
                operation.path(),
                operation.operation_id(),
            );
        }
        router
    }

    /// Adds a route.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: impl AsRef<str>,
        operation_id: impl Into<String>,
    ) {
        let route = Route::new(method, pattern.as_ref(), operation_id);
        tracing::debug!(
            method = %route.method,
            operation_id = route.operation_id,
            "Registered route"
        );
        self.routes.push(route);
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Matches an incoming request against the registered routes.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        for route in &self.routes {
            if route.method == *method {
                if let Some(params) = route.match_path(path) {
                    return Some(RouteMatch::new(&route.operation_id, params));
                }
            }
        }

        None
    }

    /// Checks whether an operation id is registered.
    #[must_use]
    pub fn has_operation(&self, operation_id: &str) -> bool {
        self.routes.iter().any(|r| r.operation_id == operation_id)
    }

    /// Returns all registered operation ids in declaration order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.operation_id.as_str())
    }
}
