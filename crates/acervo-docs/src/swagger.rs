//! Swagger UI page generation.
//!
//! [`SwaggerUi`] renders a complete HTML page that loads Swagger UI from a
//! CDN and displays an embedded OpenAPI document. The document is serialized
//! once at construction time, so a malformed spec fails at startup instead
//! of producing a blank documentation page.

use crate::error::DocsResult;
use crate::openapi::OpenApi;

/// Swagger UI configuration and HTML generation.
#[derive(Debug, Clone)]
pub struct SwaggerUi {
    /// Base path where the page is served (e.g. "/api-docs").
    path: String,
    /// Pre-serialized OpenAPI document, embedded in the page and served
    /// verbatim at [`spec_path`](Self::spec_path).
    spec_json: String,
    /// Title of the HTML page.
    title: String,
    /// Swagger UI version pinned on the CDN.
    swagger_version: String,
}

impl SwaggerUi {
    /// Creates the page for a document served under `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be serialized to JSON.
    pub fn new(path: impl Into<String>, spec: &OpenApi) -> DocsResult<Self> {
        Ok(Self {
            path: path.into(),
            spec_json: serde_json::to_string_pretty(spec)?,
            title: format!("{} - Swagger UI", spec.info.title),
            swagger_version: "5.18.2".to_string(),
        })
    }

    /// Sets the page title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the Swagger UI version loaded from the CDN.
    #[must_use]
    pub fn swagger_version(mut self, version: impl Into<String>) -> Self {
        self.swagger_version = version.into();
        self
    }

    /// Returns the base path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the path the raw JSON document is served at.
    #[must_use]
    pub fn spec_path(&self) -> String {
        format!("{}/openapi.json", self.path.trim_end_matches('/'))
    }

    /// Returns the serialized OpenAPI document.
    #[must_use]
    pub fn spec_json(&self) -> &str {
        &self.spec_json
    }

    /// Renders the complete HTML page.
    #[must_use]
    pub fn html(&self) -> String {
        format!(
            r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui.css" />
    <style>
        html {{
            box-sizing: border-box;
            overflow: -moz-scrollbars-vertical;
            overflow-y: scroll;
        }}
        *,
        *:before,
        *:after {{
            box-sizing: inherit;
        }}
        body {{
            margin: 0;
            background: #fafafa;
        }}
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@{version}/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {{
            const spec = {spec_json};

            window.ui = SwaggerUIBundle({{
                spec: spec,
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                plugins: [
                    SwaggerUIBundle.plugins.DownloadUrl
                ],
                layout: "StandaloneLayout"
            }});
        }};
    </script>
</body>
</html>"##,
            title = html_escape(&self.title),
            version = self.swagger_version,
            spec_json = self.spec_json,
        )
    }

    /// Renders the page as bytes for an HTTP response body.
    #[must_use]
    pub fn html_bytes(&self) -> bytes::Bytes {
        bytes::Bytes::from(self.html())
    }
}

/// Simple HTML escape for the title.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openapi::Info;

    fn create_test_spec() -> OpenApi {
        OpenApi {
            openapi: "3.0.0".to_string(),
            info: Info {
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
                description: Some("A test API".to_string()),
            },
            paths: indexmap::IndexMap::new(),
            components: None,
            tags: vec![],
        }
    }

    #[test]
    fn test_swagger_ui_creation() {
        let swagger = SwaggerUi::new("/api-docs", &create_test_spec()).unwrap();

        assert_eq!(swagger.path(), "/api-docs");
        assert_eq!(swagger.spec_path(), "/api-docs/openapi.json");
        assert_eq!(swagger.title, "Test API - Swagger UI");
    }

    #[test]
    fn test_swagger_ui_customization() {
        let swagger = SwaggerUi::new("/docs", &create_test_spec())
            .unwrap()
            .title("Custom Title")
            .swagger_version("5.0.0");

        assert_eq!(swagger.title, "Custom Title");
        assert_eq!(swagger.swagger_version, "5.0.0");
        assert!(swagger.html().contains("swagger-ui-dist@5.0.0"));
    }

    #[test]
    fn test_swagger_ui_html_generation() {
        let swagger = SwaggerUi::new("/api-docs", &create_test_spec()).unwrap();
        let html = swagger.html();

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("swagger-ui"));
        assert!(html.contains("Test API"));
        assert!(html.contains("SwaggerUIBundle"));
    }

    #[test]
    fn test_embedded_spec_matches_spec_json() {
        let swagger = SwaggerUi::new("/api-docs", &create_test_spec()).unwrap();

        assert!(swagger.spec_json().contains("3.0.0"));
        assert!(swagger.html().contains(swagger.spec_json()));
    }

    #[test]
    fn test_spec_path_trailing_slash() {
        let swagger = SwaggerUi::new("/api-docs/", &create_test_spec()).unwrap();
        assert_eq!(swagger.spec_path(), "/api-docs/openapi.json");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("\"test\""), "&quot;test&quot;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
    }

    #[test]
    fn test_html_bytes() {
        let swagger = SwaggerUi::new("/api-docs", &create_test_spec()).unwrap();
        let bytes = swagger.html_bytes();

        assert!(!bytes.is_empty());
        assert!(bytes.len() > 100);
    }
}
