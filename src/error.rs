//! Unified error types for chatctx.
//!
//! This module provides a single [`ChatctxError`] enum that covers every
//! failure in the library: reading transcripts, writing tables, and talking
//! to the chat-completion endpoints.
//!
//! # Propagation
//!
//! Errors are always local to one input file (or one file/model pair for the
//! remote calls). The [`batch`](crate::batch) driver logs them and moves on;
//! an empty input directory is reported and ends the run without an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatctx operations.
///
/// # Example
///
/// ```rust
/// use chatctx::error::Result;
/// use chatctx::ParsedMessage;
///
/// fn my_function() -> Result<Vec<ParsedMessage>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatctxError>;

/// The error type for all chatctx operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatctxError {
    /// An I/O error occurred (missing file, permission denied, disk full).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The transcript could not be turned into messages.
    ///
    /// Raised when no `DD/MM/YYYY HH:MM - ` header matches anywhere in the
    /// input, or when the file is not valid UTF-8.
    #[error("Malformed transcript{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    MalformedInput {
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// No API key is configured for a provider.
    #[error("Missing credential for {provider}: set the {env_var} environment variable")]
    MissingCredential {
        /// Provider name (e.g. "claude", "gpt")
        provider: &'static str,
        /// Environment variable that was consulted
        env_var: String,
    },

    /// The remote call failed.
    ///
    /// `status` is `None` for transport failures and timeouts; otherwise it
    /// holds the HTTP status and `body` is the response body, verbatim.
    #[error("{provider} request failed{}: {body}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
    RemoteRequest {
        /// Provider name
        provider: &'static str,
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Response body or transport error description
        body: String,
    },

    /// A successful response could not be decoded into the expected shape.
    #[error("Failed to decode {provider} response: {message}")]
    Decode {
        /// Provider name
        provider: &'static str,
        /// Description of what was missing
        message: String,
    },

    /// A tabular file doesn't match the expected structure.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing/serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration (bad role file, bad log filter, ...).
    #[error("Configuration error: {0}")]
    Config(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatctxError {
    /// Creates a malformed-input error.
    pub fn malformed(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        ChatctxError::MalformedInput {
            message: message.into(),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        ChatctxError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates a missing credential error.
    pub fn missing_credential(provider: &'static str, env_var: impl Into<String>) -> Self {
        ChatctxError::MissingCredential {
            provider,
            env_var: env_var.into(),
        }
    }

    /// Creates a remote request error.
    pub fn remote(provider: &'static str, status: Option<u16>, body: impl Into<String>) -> Self {
        ChatctxError::RemoteRequest {
            provider,
            status,
            body: body.into(),
        }
    }

    /// Creates a decode error.
    pub fn decode(provider: &'static str, message: impl Into<String>) -> Self {
        ChatctxError::Decode {
            provider,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatctxError::Io(_))
    }

    /// Returns `true` if this is a malformed transcript error.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, ChatctxError::MalformedInput { .. })
    }

    /// Returns `true` if this is a missing credential error.
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, ChatctxError::MissingCredential { .. })
    }

    /// Returns `true` if this is a remote request error.
    pub fn is_remote_request(&self) -> bool {
        matches!(self, ChatctxError::RemoteRequest { .. })
    }

    /// Returns `true` if this is a decode error.
    pub fn is_decode(&self) -> bool {
        matches!(self, ChatctxError::Decode { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, ChatctxError::InvalidFormat { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
