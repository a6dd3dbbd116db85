//! Structured logging for the Acervo API.
//!
//! JSON output by default (one object per line, for log shippers), pretty
//! output for local development. Both honor an `EnvFilter` expression, so
//! `ACERVO_LOG=acervo_server=debug` style filters work as usual.
//!
//! # Example
//!
//! ```rust,ignore
//! use acervo_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::from_env())?;
//! tracing::info!(port = 3000, "Server starting");
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Environment variable holding the filter expression (default `info`).
pub const ENV_LOG_FILTER: &str = "ACERVO_LOG";

/// Environment variable selecting the output format, `json` or `pretty`.
pub const ENV_LOG_FORMAT: &str = "ACERVO_LOG_FORMAT";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter expression (e.g., "info", "acervo_server=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            file_line_info: true,
            include_target: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            file_line_info: false,
            include_target: true,
        }
    }

    /// Builds a configuration from `ACERVO_LOG` and `ACERVO_LOG_FORMAT`.
    ///
    /// Unset variables fall back to production defaults (`info`, JSON).
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(ENV_LOG_FILTER).ok().as_deref(),
            std::env::var(ENV_LOG_FORMAT).ok().as_deref(),
        )
    }

    fn from_values(level: Option<&str>, format: Option<&str>) -> Self {
        let mut config = match format {
            Some(fmt) if fmt.eq_ignore_ascii_case("pretty") => Self::development(),
            _ => Self::production(),
        };
        if let Some(level) = level {
            if !level.is_empty() {
                config.level = level.to_string();
            }
        }
        config
    }
}

/// Initializes the global logging subscriber.
///
/// Call once, before anything logs. A second call fails because the global
/// subscriber is already set.
///
/// # Errors
///
/// Returns [`TelemetryError::LoggingInit`] when the filter expression is
/// invalid or a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))?;

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}
