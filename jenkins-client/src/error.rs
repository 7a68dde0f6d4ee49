//! Error types for the Jenkins client

use std::sync::Arc;

use thiserror::Error;

use crate::promise::PromiseError;
use crate::transport::TransportError;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Jenkins client
///
/// Every variant raised by an API operation carries the server-relative path
/// that failed. Raw transport errors never escape without that context.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Construction arguments were rejected before any network I/O
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The transport could not build the request or its body
    #[error("transport could not build request for {path}: {source}")]
    Transport {
        path: String,
        #[source]
        source: TransportError,
    },

    /// Crumb bootstrap failed or returned an incomplete crumb
    #[error("failed to fetch crumb from {path}: {reason}")]
    CrumbFetch {
        path: String,
        reason: String,
        #[source]
        source: Option<Box<ClientError>>,
    },

    /// Response body could not be decoded into the expected shape
    #[error("invalid response from {path}: {message}")]
    Protocol {
        path: String,
        message: String,
        #[source]
        source: Option<Arc<dyn std::error::Error + Send + Sync>>,
    },

    /// Request was rejected by the transport or answered with an error status
    #[error("request to {path} failed: {message}")]
    Request {
        path: String,
        /// HTTP status code, absent when no response was received
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<TransportError>,
    },

    /// Job creation hit an existing job with the same name
    #[error("job '{name}' already exists")]
    JobAlreadyExists { name: String },

    /// Server answered 404
    #[error("resource not found at {path}")]
    NotFound { path: String },

    /// A caller-built promise was abandoned before settling
    ///
    /// Client operations never return this: they report abandonment as
    /// `Request` with the failing path.
    #[error(transparent)]
    Abandoned(#[from] PromiseError),
}

impl ClientError {
    /// Wrap a transport rejection for the given path
    pub fn request_failed(path: impl Into<String>, source: TransportError) -> Self {
        Self::Request {
            path: path.into(),
            status: None,
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Create an error for an unexpected HTTP status
    pub fn status(path: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            path: path.into(),
            status: Some(status),
            message: message.into(),
            source: None,
        }
    }

    /// Create a decode error for the given path
    pub fn protocol(path: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Protocol {
            path: path.into(),
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    /// Path of the failing request, if the error came from one
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Transport { path, .. }
            | Self::CrumbFetch { path, .. }
            | Self::Protocol { path, .. }
            | Self::Request { path, .. }
            | Self::NotFound { path } => Some(path),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status_code(), Some(status) if status >= 500)
    }
}
