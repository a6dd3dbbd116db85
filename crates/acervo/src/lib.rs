//! # Acervo
//!
//! **Generic RM-keyed collection HTTP API**
//!
//! Acervo is a small HTTP service that stores open JSON records in named
//! collections. Every record belongs to an owner identified by its `rm`
//! field; items can be created, listed, filtered by owner, and deleted.
//! A static theme directory maps owner identifiers to project themes, and
//! the whole API surface is described by a contract that drives both the
//! router and the published OpenAPI document.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use acervo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     init_logging(&LogConfig::from_env())?;
//!
//!     let server = Server::builder()
//!         .config(ServerConfig::from_env())
//!         .router(Router::from_contract(&api_contract()))
//!         .build();
//!
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/acervo/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use acervo_core as core;

// Re-export server types
pub use acervo_server as server;

// Re-export documentation types
pub use acervo_docs as docs;

// Re-export telemetry types
pub use acervo_telemetry as telemetry;

/// Crate version, reported by `/health` and `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use acervo::prelude::*;
/// ```
pub mod prelude {
    pub use acervo_core::{
        api_contract, AcervoError, AcervoResult, ApiContract, CollectionStore, Fields, Item,
        ThemeDirectory, ThemeStrategy,
    };

    // Re-export the server surface
    pub use acervo_server::{AppState, Router, Server, ServerConfig, ShutdownSignal};

    // Re-export documentation builders
    pub use acervo_docs::{generic_item_schema, OpenApiGenerator, SwaggerUi};

    // Re-export logging setup
    pub use acervo_telemetry::{init_logging, LogConfig};
}
