//! # Acervo Docs
//!
//! API documentation for the Acervo server.
//!
//! This crate provides:
//! - **OpenAPI document generation** from the canonical [`ApiContract`](acervo_core::ApiContract)
//! - **Swagger UI** page rendering for interactive API exploration
//!
//! ## Quick Start
//!
//! ```rust
//! use acervo_core::api_contract;
//! use acervo_docs::{generic_item_schema, OpenApiGenerator, SwaggerUi};
//!
//! let contract = api_contract();
//! let spec = OpenApiGenerator::new()
//!     .schema("GenericItem", generic_item_schema())
//!     .generate(&contract)
//!     .unwrap();
//!
//! let swagger = SwaggerUi::new("/api-docs", &spec).unwrap();
//! assert_eq!(swagger.spec_path(), "/api-docs/openapi.json");
//! ```
//!
//! The router is built from the same contract the generator walks, so the
//! served documentation always matches dispatch.

mod error;
mod openapi;
mod swagger;

pub use error::{DocsError, DocsResult};
pub use openapi::{
    generic_item_schema, Components, Info, MediaType, OpenApi, OpenApiGenerator, OperationObject,
    Parameter, ParameterIn, PathItem, RequestBody, Response, Schema, SchemaType, Tag,
    OPENAPI_VERSION,
};
pub use swagger::SwaggerUi;
