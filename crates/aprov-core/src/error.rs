//! Error types for the APROV client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the entire APROV client.
///
/// Variants follow the failure taxonomy of the client: validation problems are
/// reported before anything touches the network, transport and HTTP failures
/// come from the REST layer, and partial batches describe what was already
/// committed on the server when a later call failed.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AprovError {
    /// Input rejected before any network call (malformed profile, missing justification)
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// Timeout, DNS or connection failure
    #[error("Transport error: {message}")]
    Transport { message: String, timeout: bool },

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Failed login, failed biometric challenge, expired refresh token
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// A per-type batch call failed after earlier types were already applied
    #[error(
        "Batch only partially completed: {failed_type} failed after [{}] succeeded: {message}",
        .completed.join(", ")
    )]
    PartialBatch {
        completed: Vec<String>,
        failed_type: String,
        message: String,
    },

    /// Document type without an item endpoint
    #[error("Unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    /// No valid connection profile is active
    #[error("No active connection profile")]
    NotConnected,

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AprovError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Validation error from a single message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Creates a non-timeout Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timeout: false,
        }
    }

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a transport timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timeout: true, .. })
    }

    /// Check if this is an Authentication error or an HTTP 401
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            Self::Authentication(_) | Self::Http { status: 401, .. }
        )
    }

    /// Check if this is a partially applied batch
    pub fn is_partial_batch(&self) -> bool {
        matches!(self, Self::PartialBatch { .. })
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns a short message suitable for showing to the user.
    ///
    /// Transport failures collapse into a generic message, except timeouts.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { timeout: true, .. } => "Connection timed out".to_string(),
            Self::Transport { .. } => "Connection error".to_string(),
            Self::Http { status: 401, .. } => "Session expired, sign in again".to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AprovError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AprovError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for AprovError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for AprovError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for AprovError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Http {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        if err.is_decode() {
            return Self::Serialization {
                format: "JSON".to_string(),
                message: err.to_string(),
            };
        }
        Self::Transport {
            message: err.to_string(),
            timeout: err.is_timeout(),
        }
    }
}

/// A type alias for `Result<T, AprovError>`.
pub type Result<T> = std::result::Result<T, AprovError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_joins_messages() {
        let err = AprovError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "Validation failed: a, b");
        assert!(err.is_validation());
    }

    #[test]
    fn test_partial_batch_lists_completed_types() {
        let err = AprovError::PartialBatch {
            completed: vec!["SC".into(), "PC".into()],
            failed_type: "AE".into(),
            message: "HTTP 500".into(),
        };
        let text = err.to_string();
        assert!(text.contains("AE failed"));
        assert!(text.contains("[SC, PC]"));
    }

    #[test]
    fn test_user_message_distinguishes_timeout() {
        let timeout = AprovError::Transport {
            message: "operation timed out".into(),
            timeout: true,
        };
        assert!(timeout.is_timeout());
        assert_eq!(timeout.user_message(), "Connection timed out");
        assert_eq!(AprovError::transport("dns").user_message(), "Connection error");
    }

    #[test]
    fn test_http_401_counts_as_authentication() {
        let err = AprovError::Http {
            status: 401,
            message: "unauthorized".into(),
        };
        assert!(err.is_authentication());
    }
}
