//! # Acervo Server
//!
//! HTTP server for the Acervo generic collection API.
//!
//! This crate provides the server infrastructure for Acervo:
//!
//! - HTTP/1.1 via Hyper with graceful shutdown
//! - Contract-derived request routing ([`Router`])
//! - Collection and theme handlers over [`acervo_core`] state ([`AppState`])
//! - Health and readiness probes, CORS, and documentation endpoints
//!
//! ## Example
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

#![doc(html_root_url = "https://docs.rs/acervo-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod cors;
mod handlers;
mod health;
mod response;
mod router;
mod server;
mod shutdown;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SHUTDOWN_TIMEOUT_SECS, ENV_HOST, ENV_PORT,
};
pub use cors::CorsLayer;
pub use handlers::AppState;
pub use health::{HealthCheck, HealthStatus, ReadinessCheck, ReadinessStatus};
pub use response::{html_response, json_bytes_response, json_response, HttpResponse, ResponseBody};
pub use router::{RouteMatch, Router};
pub use server::{DocsEndpoints, Server, ServerBuilder, ServerError};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
