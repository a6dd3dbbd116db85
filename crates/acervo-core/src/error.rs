//! Error types for the Acervo API.
//!
//! This module provides [`AcervoError`], the error type shared by the
//! collection store, the theme directory, and the request handlers. Every
//! variant carries the exact human-readable message that goes on the wire:
//! the `Display` output of an error IS its response body message, and
//! [`AcervoError::to_envelope`] wraps it in the `{"error": ...}` JSON body
//! the API returns for every failure.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`AcervoError`].
pub type AcervoResult<T> = Result<T, AcervoError>;

/// Standard error type for the Acervo API.
///
/// The taxonomy is deliberately small: every failure a request can hit is a
/// validation problem, a missing resource, or an unparseable identifier.
/// Infrastructure failures (bind errors, I/O) live in the server crate and
/// never reach this type.
///
/// # Example
///
/// ```
/// use acervo_core::AcervoError;
///
/// fn require_rm(rm: Option<&str>) -> Result<(), AcervoError> {
///     match rm {
///         Some(rm) if !rm.is_empty() => Ok(()),
///         _ => Err(AcervoError::validation("O campo 'rm' é obrigatório")),
///     }
/// }
///
/// let err = require_rm(None).unwrap_err();
/// assert_eq!(err.to_string(), "O campo 'rm' é obrigatório");
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AcervoError {
    /// A required field is absent or the request body is unusable.
    #[error("{message}")]
    Validation {
        /// Human-readable message, returned verbatim to the client.
        message: String,
    },

    /// The targeted item or theme does not exist.
    #[error("{message}")]
    NotFound {
        /// Human-readable message, returned verbatim to the client.
        message: String,
    },

    /// An identifier that must be numeric could not be parsed.
    #[error("{message}")]
    InvalidIdentifier {
        /// Human-readable message, returned verbatim to the client.
        message: String,
    },
}

impl AcervoError {
    /// Creates a validation error with a message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    /// Returns a machine-readable error code, used in logs only.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
        }
    }

    /// Converts this error to the serializable envelope the API returns.
    ///
    /// The envelope is exactly `{"error": "<message>"}`; no code, category,
    /// or correlation id is exposed to clients.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.to_string(),
        }
    }
}

/// Serializable error envelope for HTTP responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = AcervoError::validation("O campo 'rm' é obrigatório");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "VALIDATION_ERROR");
        assert_eq!(error.to_string(), "O campo 'rm' é obrigatório");
    }

    #[test]
    fn test_not_found_error() {
        let error = AcervoError::not_found("Item não encontrado");
        assert_eq!(error.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.code(), "NOT_FOUND");
        assert_eq!(error.to_string(), "Item não encontrado");
    }

    #[test]
    fn test_invalid_identifier_error() {
        let error = AcervoError::invalid_identifier("RM inválido");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "INVALID_IDENTIFIER");
        assert_eq!(error.to_string(), "RM inválido");
    }

    #[test]
    fn test_error_envelope_serialization() {
        let error = AcervoError::not_found("Item não encontrado");
        let json = serde_json::to_string(&error.to_envelope()).expect("serialization should work");
        assert_eq!(json, r#"{"error":"Item não encontrado"}"#);
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = AcervoError::validation("JSON inválido no corpo da requisição").to_envelope();
        let json = serde_json::to_string(&envelope).expect("serialization should work");
        let back: ErrorEnvelope = serde_json::from_str(&json).expect("deserialization should work");
        assert_eq!(back, envelope);
    }
}
