//! # Acervo Core
//!
//! Domain types for the Acervo generic item API.
//!
//! This crate provides everything below the HTTP layer:
//!
//! - [`Item`] - An open record: server-assigned `id`, mandatory `rm`, any extra fields
//! - [`CollectionStore`] - In-memory, process-lifetime collections of items
//! - [`ThemeDirectory`] - Static identifier-to-theme lookup (modulo or membership)
//! - [`AcervoError`] - The request-level error taxonomy with wire-faithful messages
//! - [`ApiContract`] - The canonical operation table the router and docs are built from

#![doc(html_root_url = "https://docs.rs/acervo-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod contract;
mod context;
mod error;
mod record;
mod store;
mod theme;

pub use context::RequestId;
pub use contract::{api_contract, ops, ApiContract, Operation, PathParam, ResponseSpec, TagSpec};
pub use error::{AcervoError, AcervoResult, ErrorEnvelope};
pub use record::{Fields, Item};
pub use store::CollectionStore;
pub use theme::{ResolvedTheme, ThemeDirectory, ThemeLoadError, ThemeRecord, ThemeStrategy};
