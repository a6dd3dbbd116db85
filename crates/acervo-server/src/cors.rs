//! Cross-origin resource sharing.
//!
//! The API is open to browser clients from any origin, so the layer is
//! permissive by construction: every response carries a wildcard
//! `Access-Control-Allow-Origin` and preflight OPTIONS requests are
//! answered with 204 before routing.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;

use crate::response::HttpResponse;

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "access-control-allow-origin";
    /// `Access-Control-Allow-Methods` header.
    pub const ALLOW_METHODS: &str = "access-control-allow-methods";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "access-control-allow-headers";
    /// `Access-Control-Max-Age` header.
    pub const MAX_AGE: &str = "access-control-max-age";
    /// `Access-Control-Request-Method` header (preflight).
    pub const REQUEST_METHOD: &str = "access-control-request-method";
    /// `Origin` header.
    pub const ORIGIN: &str = "origin";
    /// `Vary` header.
    pub const VARY: &str = "vary";
}

/// Permissive CORS layer.
#[derive(Debug, Clone)]
pub struct CorsLayer {
    /// Methods advertised in preflight responses
    allowed_methods: Vec<Method>,

    /// Preflight cache duration advertised to browsers
    max_age: Duration,
}

impl CorsLayer {
    /// Creates a layer that allows any origin.
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            allowed_methods: vec![
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::PATCH,
                Method::OPTIONS,
            ],
            max_age: Duration::from_secs(86400),
        }
    }

    /// Checks whether a request is a CORS preflight request.
    #[must_use]
    pub fn is_preflight<B>(&self, request: &Request<B>) -> bool {
        request.method() == Method::OPTIONS
            && request.headers().contains_key(headers::ORIGIN)
            && request.headers().contains_key(headers::REQUEST_METHOD)
    }

    /// Builds the 204 preflight response.
    #[must_use]
    pub fn preflight_response(&self) -> HttpResponse {
        let methods = self
            .allowed_methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");

        Response::builder()
            .status(StatusCode::NO_CONTENT)
            .header(headers::ALLOW_ORIGIN, "*")
            .header(headers::ALLOW_METHODS, methods)
            .header(headers::ALLOW_HEADERS, "*")
            .header(headers::MAX_AGE, self.max_age.as_secs().to_string())
            .header(
                headers::VARY,
                "Origin, Access-Control-Request-Method, Access-Control-Request-Headers",
            )
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
    }

    /// Adds CORS headers to a non-preflight response.
    pub fn apply(&self, response: &mut HttpResponse) {
        let headers = response.headers_mut();
        headers.insert(headers::ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(headers::VARY, HeaderValue::from_static("Origin"));
    }
}

impl Default for CorsLayer {
    fn default() -> Self {
        Self::permissive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preflight_request() -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/livros")
            .header(headers::ORIGIN, "https://app.example.com")
            .header(headers::REQUEST_METHOD, "POST")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    #[test]
    fn test_is_preflight() {
        let cors = CorsLayer::permissive();

        assert!(cors.is_preflight(&preflight_request()));

        // OPTIONS without the request-method header is not a preflight.
        let bare_options = Request::builder()
            .method(Method::OPTIONS)
            .uri("/livros")
            .header(headers::ORIGIN, "https://app.example.com")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert!(!cors.is_preflight(&bare_options));

        // Neither is a plain GET with an Origin header.
        let get = Request::builder()
            .method(Method::GET)
            .uri("/livros")
            .header(headers::ORIGIN, "https://app.example.com")
            .body(Full::new(Bytes::new()))
            .unwrap();
        assert!(!cors.is_preflight(&get));
    }

    #[test]
    fn test_preflight_response_headers() {
        let cors = CorsLayer::permissive();
        let response = cors.preflight_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers().get(headers::ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(response.headers().get(headers::ALLOW_HEADERS).unwrap(), "*");
        assert_eq!(response.headers().get(headers::MAX_AGE).unwrap(), "86400");

        let methods = response
            .headers()
            .get(headers::ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(methods.contains("POST"));
        assert!(methods.contains("DELETE"));
    }

    #[test]
    fn test_apply_adds_wildcard_origin() {
        let cors = CorsLayer::permissive();
        let mut response = Response::builder()
            .status(StatusCode::OK)
            .body(Full::new(Bytes::from_static(b"[]")))
            .unwrap();

        cors.apply(&mut response);

        assert_eq!(response.headers().get(headers::ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(response.headers().get(headers::VARY).unwrap(), "Origin");
    }
}
