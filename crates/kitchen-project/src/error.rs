// ABOUTME: Error types for repository and transport operations
// ABOUTME: Recoverable failures only; contract violations panic at the call site

use kitchen_types::Format;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjectError>;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Malformed {format} response: {source}")]
    Json {
        format: Format,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] TransportError),
}

impl ProjectError {
    /// Create a JSON parse error for a response of the given format
    pub fn json(format: Format, source: serde_json::Error) -> Self {
        Self::Json { format, source }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid request uri '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("Network error for {uri}: {source}")]
    Network {
        uri: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {uri} timed out")]
    Timeout { uri: String },

    #[error("{uri} answered {status}")]
    Status {
        uri: String,
        status: u16,
        body: String,
    },
}

impl TransportError {
    pub fn invalid_uri<S: Into<String>, R: Into<String>>(uri: S, reason: R) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }

    pub fn network<S, E>(uri: S, error: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            uri: uri.into(),
            source: Box::new(error),
        }
    }

    pub fn timeout<S: Into<String>>(uri: S) -> Self {
        Self::Timeout { uri: uri.into() }
    }

    pub fn status<S: Into<String>, B: Into<String>>(uri: S, status: u16, body: B) -> Self {
        Self::Status {
            uri: uri.into(),
            status,
            body: body.into(),
        }
    }

    /// Response body carried by the failure, if the server answered at all
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}
