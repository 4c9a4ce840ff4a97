//! Domain error types
//!
//! This module defines the error hierarchy for Fauna. Record- and batch-level
//! failures are recovered inside the pipeline and reported in the run summary;
//! only the variants here ever propagate to a caller.

use thiserror::Error;

/// Main Fauna error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum FaunaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP transport errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Fatal pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors surfaced by the resilient transport
///
/// Transient failures (connection errors, timeouts, retryable 5xx statuses)
/// never escape the transport directly; they only surface as
/// [`TransportError::RetriesExhausted`] once every attempt has been used.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Every attempt failed with a retryable condition
    #[error("{method} {url} failed after {attempts} attempt(s): {last_error}")]
    RetriesExhausted {
        method: String,
        url: String,
        attempts: u32,
        last_status: Option<u16>,
        last_error: String,
    },

    /// Non-retryable HTTP status
    #[error("{method} {url} returned non-retryable status {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response from {method} {url}: {message}")]
    InvalidResponse {
        method: String,
        url: String,
        message: String,
    },

    /// Request could not be constructed
    #[error("Invalid request {method} {url}: {message}")]
    InvalidRequest {
        method: String,
        url: String,
        message: String,
    },

    /// Shutdown was signalled while the request was pending
    #[error("{method} {url} cancelled after {attempts} attempt(s)")]
    Cancelled {
        method: String,
        url: String,
        attempts: u32,
    },
}

impl TransportError {
    /// Whether the error was produced without exhausting the retry budget
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TransportError::Status { .. }
                | TransportError::InvalidResponse { .. }
                | TransportError::InvalidRequest { .. }
        )
    }

    /// Whether the error came from the shutdown signal
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TransportError::Cancelled { .. })
    }

    /// HTTP status associated with the failure, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::RetriesExhausted { last_status, .. } => *last_status,
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The URL the failed request targeted
    pub fn url(&self) -> &str {
        match self {
            TransportError::RetriesExhausted { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::InvalidResponse { url, .. }
            | TransportError::InvalidRequest { url, .. }
            | TransportError::Cancelled { url, .. } => url,
        }
    }
}

/// Errors that abort a pipeline run
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The listing walk could not fetch a page
    #[error("Listing page {page} could not be fetched from {url}: {source}")]
    ListingFailed {
        page: u32,
        url: String,
        #[source]
        source: TransportError,
    },
}

/// Errors produced while transforming a single record
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// Record carried no identifier
    #[error("Record is missing its identifier")]
    MissingId,

    /// Record carried no name
    #[error("Record {0} is missing its name")]
    MissingName(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for FaunaError {
    fn from(err: std::io::Error) -> Self {
        FaunaError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for FaunaError {
    fn from(err: serde_json::Error) -> Self {
        FaunaError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for FaunaError {
    fn from(err: toml::de::Error) -> Self {
        FaunaError::Configuration(format!("TOML parse error: {err}"))
    }
}
