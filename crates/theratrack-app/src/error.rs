//! Error types for the clinic application.

use theratrack_client::{ApiError, ConfigError, ControllerError, StorageError};
use thiserror::Error;

/// Errors surfaced by the screens and the [`ClinicShell`](crate::lifecycle::ClinicShell).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClinicError {
    /// A collection request failed or its controller is gone.
    #[error(transparent)]
    Controller(#[from] ControllerError),

    /// A direct request (login, dashboard, form data) failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session store could not be opened.
    #[error("Session storage error: {0}")]
    Storage(String),

    /// A controller task panicked or was cancelled.
    #[error("Controller task failed: {0}")]
    Task(String),
}

impl From<StorageError> for ClinicError {
    fn from(e: StorageError) -> Self {
        ClinicError::Storage(e.to_string())
    }
}

impl ClinicError {
    /// True when the server rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        let api = match self {
            ClinicError::Api(e) => Some(e),
            ClinicError::Controller(e) => e.api(),
            _ => None,
        };
        matches!(api, Some(ApiError::Unauthorized))
    }
}
