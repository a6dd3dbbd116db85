//! Documentation error types.

use thiserror::Error;

/// Result type alias using [`DocsError`].
pub type DocsResult<T> = Result<T, DocsError>;

/// Errors that can occur while generating documentation.
#[derive(Debug, Error)]
pub enum DocsError {
    /// An operation uses an HTTP method the document model cannot place.
    #[error("operation '{operation_id}' uses unsupported HTTP method {method}")]
    UnsupportedMethod {
        /// The offending operation.
        operation_id: String,
        /// The method that has no path-item slot.
        method: String,
    },

    /// An operation references a component schema nobody registered.
    #[error("operation '{operation_id}' references unregistered schema '{schema}'")]
    MissingSchema {
        /// The offending operation.
        operation_id: String,
        /// The schema name the operation asked for.
        schema: String,
    },

    /// The document could not be serialized.
    #[error("failed to serialize OpenAPI document: {0}")]
    Serialization(#[from] serde_json::Error),
}
