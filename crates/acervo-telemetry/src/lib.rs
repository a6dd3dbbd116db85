//! # Acervo Telemetry
//!
//! Logging setup for the Acervo API: `tracing` with an `EnvFilter` and
//! either JSON (production) or pretty (development) output.

#![doc(html_root_url = "https://docs.rs/acervo-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, ENV_LOG_FILTER, ENV_LOG_FORMAT};

/// Result type alias using [`TelemetryError`].
pub type TelemetryResult<T> = Result<T, TelemetryError>;
