//! HTTP server implementation.
//!
//! Built on Hyper and Tokio. The server owns the contract-derived router,
//! the shared application state, and the built-in surface around the API:
//! health probes, documentation endpoints, CORS, and graceful shutdown.
//!
//! # Request path
//!
//! 1. CORS preflight requests are answered immediately with 204
//! 2. `GET /health`, `GET /ready`, and the documentation paths are served
//!    without touching the body
//! 3. The body is collected under the configured size and time limits
//! 4. The router maps method + path to an operation and its handler runs
//! 5. Domain errors become `{"error": message}` with their status code;
//!    unmatched routes become 404
//!
//! # Example
//!
//! ```rust,ignore
//! use acervo_core::api_contract;
//! use acervo_server::{Router, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::builder()
//!         .config(ServerConfig::from_env())
//!         .router(Router::from_contract(&api_contract()))
//!         .build();
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, Request, StatusCode};
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;

use acervo_core::{AcervoError, ErrorEnvelope, RequestId};

use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::cors::CorsLayer;
use crate::handlers::{self, AppState};
use crate::health::{HealthCheck, ReadinessCheck};
use crate::response::{html_response, json_bytes_response, json_response, HttpResponse};
use crate::router::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Pre-rendered documentation endpoints.
///
/// The server stays decoupled from spec generation: whoever builds the
/// OpenAPI document hands over the finished bytes and the paths to serve
/// them under.
#[derive(Debug, Clone)]
pub struct DocsEndpoints {
    path: String,
    spec_path: String,
    html: Bytes,
    spec_json: Bytes,
}

impl DocsEndpoints {
    /// Creates documentation endpoints under `path`.
    ///
    /// The raw JSON document is served at `{path}/openapi.json`.
    #[must_use]
    pub fn new(path: impl Into<String>, html: Bytes, spec_json: Bytes) -> Self {
        let path = path.into();
        let spec_path = format!("{}/openapi.json", path.trim_end_matches('/'));
        Self {
            path,
            spec_path,
            html,
            spec_json,
        }
    }

    /// Returns the HTML page path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the raw JSON document path.
    #[must_use]
    pub fn spec_path(&self) -> &str {
        &self.spec_path
    }

    fn html(&self) -> Bytes {
        self.html.clone()
    }

    fn spec_json(&self) -> Bytes {
        self.spec_json.clone()
    }
}

/// The Acervo HTTP server.
pub struct Server {
    config: ServerConfig,
    router: Router,
    state: AppState,
    cors: CorsLayer,
    health: HealthCheck,
    readiness: ReadinessCheck,
    docs: Option<DocsEndpoints>,
}

impl Server {
    /// Creates a server with the given configuration and defaults for
    /// everything else.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Creates a new server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the router.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the shared application state.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Returns the health check handler.
    #[must_use]
    pub fn health(&self) -> &HealthCheck {
        &self.health
    }

    /// Returns the readiness check handler.
    #[must_use]
    pub fn readiness(&self) -> &ReadinessCheck {
        &self.readiness
    }

    /// Runs the server until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be parsed or bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs the server with an externally controlled shutdown signal.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be parsed or bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddr {
                addr: self.config.http_addr().to_string(),
                source,
            })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::info!("Server listening on {}", addr);

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(error) = server
                                    .handle_connection(stream, remote_addr, shutdown)
                                    .await
                                {
                                    tracing::error!("Connection error from {}: {}", remote_addr, error);
                                }
                                drop(token);
                            });
                        }
                        Err(error) => {
                            tracing::error!("Failed to accept connection: {}", error);
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        server.readiness.set_ready(false);

        let shutdown_timeout = server.config.shutdown_timeout();
        tracing::info!(
            "Waiting up to {:?} for {} connections to close",
            shutdown_timeout,
            tracker.active_connections()
        );

        tokio::select! {
            () = tracker.wait_for_drain() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    "Shutdown timeout reached, {} connections still active",
                    tracker.active_connections()
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Serves a single connection, draining it when shutdown begins.
    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!("Draining connection from {} for shutdown", remote_addr);
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    /// Handles a single HTTP request.
    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let request_id = RequestId::new();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        tracing::debug!(%request_id, %method, path, "Request received");

        if self.cors.is_preflight(&req) {
            return Ok(self.cors.preflight_response());
        }

        let mut response = if let Some(builtin) = self.handle_builtin(&method, &path) {
            builtin
        } else {
            match self.collect_body(req).await {
                Ok(body) => self.route_request(&method, &path, &body),
                Err(rejection) => rejection,
            }
        };

        self.cors.apply(&mut response);
        tracing::debug!(%request_id, status = %response.status(), "Request completed");

        Ok(response)
    }

    /// Serves the bodyless built-in endpoints: probes and documentation.
    fn handle_builtin(&self, method: &Method, path: &str) -> Option<HttpResponse> {
        if *method != Method::GET {
            return None;
        }

        match path {
            "/health" => return Some(self.handle_health()),
            "/ready" => return Some(self.handle_ready()),
            _ => {}
        }

        if let Some(docs) = &self.docs {
            if path == docs.path() {
                return Some(html_response(docs.html()));
            }
            if path == docs.spec_path() {
                return Some(json_bytes_response(StatusCode::OK, docs.spec_json()));
            }
        }

        None
    }

    fn handle_health(&self) -> HttpResponse {
        json_response(StatusCode::OK, &self.health.status())
    }

    fn handle_ready(&self) -> HttpResponse {
        let status = self.readiness.status();
        let status_code = if status.is_ready() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        json_response(status_code, &status)
    }

    /// Collects the request body under the configured size and time limits.
    ///
    /// Returns the finished rejection response on failure so the caller can
    /// hand it straight back.
    async fn collect_body<B>(&self, req: Request<B>) -> Result<Bytes, HttpResponse>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let limited = Limited::new(req.into_body(), self.config.max_body_bytes());

        match tokio::time::timeout(self.config.request_timeout(), limited.collect()).await {
            Ok(Ok(collected)) => Ok(collected.to_bytes()),
            Ok(Err(error)) => {
                if error.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                    tracing::debug!(limit = self.config.max_body_bytes(), "Request body over limit");
                    Err(json_response(
                        StatusCode::PAYLOAD_TOO_LARGE,
                        &ErrorEnvelope {
                            error: "Corpo da requisição excede o tamanho máximo".to_string(),
                        },
                    ))
                } else {
                    tracing::error!("Failed to collect request body: {}", error);
                    Err(json_response(
                        StatusCode::BAD_REQUEST,
                        &ErrorEnvelope {
                            error: "Falha ao ler o corpo da requisição".to_string(),
                        },
                    ))
                }
            }
            Err(_) => {
                tracing::warn!("Request body collection timed out");
                Err(json_response(
                    StatusCode::REQUEST_TIMEOUT,
                    &ErrorEnvelope {
                        error: "Tempo limite excedido ao ler o corpo da requisição".to_string(),
                    },
                ))
            }
        }
    }

    /// Routes a request to its operation handler.
    fn route_request(&self, method: &Method, path: &str, body: &Bytes) -> HttpResponse {
        match self.router.match_route(method, path) {
            Some(matched) => match handlers::dispatch(&self.state, &matched, body) {
                Ok(response) => response,
                Err(error) => Self::handle_domain_error(&error),
            },
            None => Self::handle_not_found(path),
        }
    }

    /// Converts a domain error into its wire envelope.
    fn handle_domain_error(error: &AcervoError) -> HttpResponse {
        tracing::debug!(code = error.code(), message = %error, "Request rejected");
        json_response(error.status_code(), &error.to_envelope())
    }

    fn handle_not_found(path: &str) -> HttpResponse {
        json_response(
            StatusCode::NOT_FOUND,
            &json!({ "error": "Not Found", "path": path }),
        )
    }
}

/// Builder for [`Server`].
///
/// # Example
///
/// ```rust
/// use acervo_core::api_contract;
/// use acervo_server::{Router, Server};
/// use std::time::Duration;
///
/// let server = Server::builder()
///     .http_addr("127.0.0.1:0")
///     .shutdown_timeout(Duration::from_secs(60))
///     .router(Router::from_contract(&api_contract()))
///     .build();
///
/// assert_eq!(server.router().route_count(), 5);
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<ServerConfig>,
    config_builder: ServerConfigBuilder,
    router: Option<Router>,
    state: Option<AppState>,
    service_name: Option<String>,
    service_version: Option<String>,
    docs: Option<DocsEndpoints>,
}

impl ServerBuilder {
    /// Creates a builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full configuration, overriding the piecemeal setters.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the HTTP bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.http_addr(addr);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.shutdown_timeout(timeout);
        self
    }

    /// Sets the request body collection timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config_builder = self.config_builder.request_timeout(timeout);
        self
    }

    /// Sets the request body size cap in bytes.
    #[must_use]
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.config_builder = self.config_builder.max_body_bytes(limit);
        self
    }

    /// Sets the router.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    /// Sets the shared application state.
    #[must_use]
    pub fn state(mut self, state: AppState) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the service name reported by `/health`.
    #[must_use]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Sets the service version reported by `/health`.
    #[must_use]
    pub fn service_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Serves pre-rendered documentation under `path`.
    #[must_use]
    pub fn docs(mut self, path: impl Into<String>, html: Bytes, spec_json: Bytes) -> Self {
        self.docs = Some(DocsEndpoints::new(path, html, spec_json));
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        let config = self.config.unwrap_or_else(|| self.config_builder.build());
        let service = self.service_name.unwrap_or_else(|| "acervo".to_string());
        let version = self
            .service_version
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

        Server {
            config,
            router: self.router.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
            cors: CorsLayer::permissive(),
            health: HealthCheck::new(service, version),
            readiness: ReadinessCheck::new(),
            docs: self.docs,
        }
    }
}

/// Server startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured listen address failed to parse.
    #[error("Invalid listen address '{addr}': {source}")]
    InvalidAddr {
        /// The configured address string.
        addr: String,
        /// The parse failure.
        source: std::net::AddrParseError,
    },

    /// Binding the TCP listener failed.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        /// The resolved socket address.
        addr: SocketAddr,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use acervo_core::api_contract;
    use http_body_util::Full;
    use serde_json::Value;

    fn test_server() -> Arc<Server> {
        Arc::new(
            Server::builder()
                .http_addr("127.0.0.1:0")
                .router(Router::from_contract(&api_contract()))
                .build(),
        )
    }

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[test]
    fn test_builder_defaults() {
        let server = Server::builder().build();

        assert_eq!(server.config().http_addr(), "0.0.0.0:3000");
        assert_eq!(server.router().route_count(), 0);
        assert_eq!(server.health().service(), "acervo");
    }

    #[test]
    fn test_builder_config_overrides_piecemeal_setters() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:4000").build();
        let server = Server::builder()
            .http_addr("127.0.0.1:5000")
            .config(config)
            .build();

        assert_eq!(server.config().http_addr(), "127.0.0.1:4000");
    }

    #[test]
    fn test_health_endpoint() {
        let server = test_server();
        let response = server.handle_builtin(&Method::GET, "/health").unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_ready_endpoint_tracks_flag() {
        let server = test_server();

        let response = server.handle_builtin(&Method::GET, "/ready").unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        server.readiness().set_ready(false);
        let response = server.handle_builtin(&Method::GET, "/ready").unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_builtin_requires_get() {
        let server = test_server();
        assert!(server.handle_builtin(&Method::POST, "/health").is_none());
        assert!(server.handle_builtin(&Method::GET, "/livros").is_none());
    }

    #[tokio::test]
    async fn test_docs_endpoints() {
        let server = Arc::new(
            Server::builder()
                .docs(
                    "/api-docs",
                    Bytes::from_static(b"<!DOCTYPE html>"),
                    Bytes::from_static(br#"{"openapi":"3.0.0"}"#),
                )
                .build(),
        );

        let page = server.handle_builtin(&Method::GET, "/api-docs").unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        assert_eq!(
            page.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/html; charset=utf-8"
        );

        let spec = server
            .handle_builtin(&Method::GET, "/api-docs/openapi.json")
            .unwrap();
        assert_eq!(body_json(spec).await["openapi"], "3.0.0");
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let server = test_server();
        let response = server.route_request(&Method::GET, "/", &Bytes::new());

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Not Found", "path": "/" })
        );
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let server = test_server();

        // Create an item in an implicitly created collection.
        let created = server.route_request(
            &Method::POST,
            "/livros",
            &Bytes::from_static(br#"{"rm":"2023001","titulo":"Dom Casmurro"}"#),
        );
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        assert_eq!(created["message"], "Item criado");
        let id = created["item"]["id"].as_str().expect("id present").to_string();

        // The collection lists it.
        let listed = server.route_request(&Method::GET, "/livros", &Bytes::new());
        assert_eq!(body_json(listed).await.as_array().unwrap().len(), 1);

        // Owner filter finds it; a different owner does not.
        let owned = server.route_request(&Method::GET, "/livros/2023001", &Bytes::new());
        assert_eq!(body_json(owned).await.as_array().unwrap().len(), 1);
        let other = server.route_request(&Method::GET, "/livros/9999999", &Bytes::new());
        assert_eq!(body_json(other).await, serde_json::json!([]));

        // Delete by owner and id, then the collection is empty again.
        let deleted = server.route_request(
            &Method::DELETE,
            &format!("/livros/2023001/{id}"),
            &Bytes::new(),
        );
        assert_eq!(deleted.status(), StatusCode::OK);
        assert_eq!(
            body_json(deleted).await,
            serde_json::json!({ "message": "Item excluído com sucesso" })
        );

        let listed = server.route_request(&Method::GET, "/livros", &Bytes::new());
        assert_eq!(body_json(listed).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_without_rm_is_rejected_with_wire_message() {
        let server = test_server();

        let response = server.route_request(
            &Method::POST,
            "/livros",
            &Bytes::from_static(br#"{"titulo":"Sem dono"}"#),
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "O campo 'rm' é obrigatório" })
        );
    }

    #[tokio::test]
    async fn test_create_with_malformed_json_is_rejected() {
        let server = test_server();

        let response = server.route_request(
            &Method::POST,
            "/livros",
            &Bytes::from_static(b"{not json"),
        );

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "JSON inválido no corpo da requisição" })
        );
    }

    #[tokio::test]
    async fn test_delete_missing_item_is_404() {
        let server = test_server();

        let response = server.route_request(
            &Method::DELETE,
            "/livros/2023001/1700000000000",
            &Bytes::new(),
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "error": "Item não encontrado" })
        );
    }

    #[tokio::test]
    async fn test_theme_route_wins_over_owner_listing() {
        let server = test_server();

        let response = server.route_request(&Method::GET, "/tema/2023001", &Bytes::new());

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["rm"], 2_023_001);
        assert!(json["tema"].is_string());
    }

    #[tokio::test]
    async fn test_theme_errors() {
        let server = test_server();

        let invalid = server.route_request(&Method::GET, "/tema/abc", &Bytes::new());
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(invalid).await,
            serde_json::json!({ "error": "RM inválido" })
        );

        // 999 is in no membership list of the built-in directory.
        let unknown = server.route_request(&Method::GET, "/tema/999", &Bytes::new());
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(unknown).await,
            serde_json::json!({ "error": "Tema não encontrado" })
        );
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_with_413() {
        let server = Arc::new(Server::builder().max_body_bytes(8).build());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/livros")
            .body(Full::new(Bytes::from_static(
                br#"{"rm":"2023001","titulo":"muito maior que oito bytes"}"#,
            )))
            .unwrap();

        let rejection = server
            .collect_body(request)
            .await
            .expect_err("body over the cap must be rejected");
        assert_eq!(rejection.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_body_under_cap_is_collected() {
        let server = test_server();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/livros")
            .body(Full::new(Bytes::from_static(br#"{"rm":"2023001"}"#)))
            .unwrap();

        let body = server.collect_body(request).await.expect("body collects");
        assert_eq!(body, Bytes::from_static(br#"{"rm":"2023001"}"#));
    }

    #[tokio::test]
    async fn test_run_with_invalid_address() {
        let server = Server::builder().http_addr("not-a-valid-address").build();

        let result = server.run_with_shutdown(ShutdownSignal::new()).await;
        assert!(matches!(result, Err(ServerError::InvalidAddr { .. })));
    }

    #[tokio::test]
    async fn test_run_and_shutdown() {
        let server = Server::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_millis(100))
            .build();

        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            server.run_with_shutdown(shutdown),
        )
        .await;

        assert!(result.is_ok());
        assert!(result.unwrap().is_ok());
    }
}
