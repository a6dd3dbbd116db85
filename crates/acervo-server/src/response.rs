//! HTTP response construction helpers.

use bytes::Bytes;
use http::{header, Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// Type alias for the HTTP response body.
pub type ResponseBody = Full<Bytes>;

/// Type alias for the HTTP response.
pub type HttpResponse = Response<ResponseBody>;

/// Builds a JSON response with the given status.
///
/// Serialization failures are logged and degrade to a plain 500; handlers
/// only pass values whose serialization cannot fail in practice.
pub fn json_response(status: StatusCode, body: &impl Serialize) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(encoded) => with_body(status, "application/json", Bytes::from(encoded)),
        Err(error) => {
            tracing::error!(%error, "Failed to serialize response body");
            with_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "application/json",
                Bytes::from_static(br#"{"error":"Internal Server Error"}"#),
            )
        }
    }
}

/// Builds a response from pre-encoded JSON bytes.
pub fn json_bytes_response(status: StatusCode, body: Bytes) -> HttpResponse {
    with_body(status, "application/json", body)
}

/// Builds a 200 HTML response.
pub fn html_response(body: Bytes) -> HttpResponse {
    with_body(StatusCode::OK, "text/html; charset=utf-8", body)
}

fn with_body(status: StatusCode, content_type: &'static str, body: Bytes) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .body(Full::new(body))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_response_sets_status_and_content_type() {
        let response = json_response(StatusCode::CREATED, &json!({"message": "Item criado"}));

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_json_bytes_response_passes_body_through() {
        let body = Bytes::from_static(br#"{"ok":true}"#);
        let response = json_bytes_response(StatusCode::OK, body);

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_html_response() {
        let response = html_response(Bytes::from_static(b"<!DOCTYPE html>"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );
    }
}
