//! Error types for the REST client.

use thiserror::Error;

/// The single failure channel of an API call.
///
/// - `Transport`: no HTTP response was received (connect, DNS, timeout). The
///   underlying `reqwest::Error` is passed through untouched.
/// - `Application`: a response arrived with a status outside `[200, 300)`.
///   `Display` yields the normalized message and nothing else.
/// - `InvalidRequest`: the request could not be built, nothing was sent.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Application { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status of an application error, `None` for the other variants.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Application { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Construction-time failures. A client is never built from invalid options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Base URL must not be empty")]
    MissingUrl,

    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Timeout must be at least one second")]
    ZeroTimeout,

    #[error("OAuth 1.0a requires `{0}` unless basic auth is enabled")]
    MissingCredential(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Failed to read options file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse options file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to build HTTP transport: {0}")]
    Transport(#[source] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;
