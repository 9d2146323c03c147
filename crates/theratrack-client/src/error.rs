//! # Client Errors
//!
//! Every layer of the client has its own error enum. Request plumbing fails with
//! [`ApiError`], the generic controller wraps that in [`ControllerError`], and the
//! durable token storage reports [`StorageError`].

/// Failures of a single call made through [`ApiClient`](crate::ApiClient).
///
/// The three variants that matter to screens are [`Network`](ApiError::Network)
/// (no response at all), [`Unauthorized`](ApiError::Unauthorized) (HTTP 401, the
/// session has already been torn down when the caller sees it) and
/// [`Server`](ApiError::Server) (any other non-2xx status).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Network failure: {0}")]
    Network(String),
    #[error("Not authorized")]
    Unauthorized,
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },
    #[error("Could not decode response: {0}")]
    Decode(String),
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Session storage failure: {0}")]
    Storage(String),
}

impl ApiError {
    /// True when no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Errors returned by a [`ResourceController`](crate::ResourceController).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Controller closed")]
    Closed,
    #[error("Controller dropped response channel")]
    Dropped,
    #[error("Could not merge update: {0}")]
    Merge(String),
    #[error("Page size must be positive")]
    InvalidPageSize,
}

impl ControllerError {
    /// The underlying request failure, if this error came from the wire.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            ControllerError::Api(e) => Some(e),
            _ => None,
        }
    }
}

/// Errors from the durable storage backing the session store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage format error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid base URL {0:?}: {1}")]
    BaseUrl(String, String),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
