//! Error types for the connector.
//!
//! [`FedoraError`] is what a single repository call returns. The deposit
//! surface converts it into [`DepositError`]: a rejected request becomes
//! [`DepositError::Io`] carrying only the repository's `message`, while the
//! status and raw body are logged where the response is received.

use std::path::PathBuf;

use fedora_deposit::MetadataError;
use fedora_deposit_api::RepositoryErrorBody;

use crate::storage::StorageError;

/// Errors from one HTTP exchange with the repository.
#[derive(Debug, thiserror::Error)]
pub enum FedoraError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The repository answered with a 4xx or 5xx status.
    #[error("repository returned status {status}: {body}")]
    Repository { status: u16, body: String },

    /// The response body exceeded the configured in-memory limit.
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },
}

/// Errors surfaced by a deposit call.
#[derive(Debug, thiserror::Error)]
pub enum DepositError {
    /// The repository rejected a request; carries its error message.
    #[error("{0}")]
    Io(String),

    /// The creation response held no identifier segment.
    #[error("no identifier found in {0:?}")]
    InvalidHandle(String),

    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl From<FedoraError> for DepositError {
    fn from(e: FedoraError) -> Self {
        match e {
            FedoraError::Http(e) => DepositError::Http(e),
            FedoraError::ResponseTooLarge { limit } => DepositError::ResponseTooLarge { limit },
            FedoraError::Repository { status, body } => {
                DepositError::Io(repository_message(status, &body))
            }
        }
    }
}

/// Errors from the non-deposit connector calls.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The logo exists but reading it failed.
    #[error("failed to read logo {path}: {source}")]
    Logo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// The `message` of a structured body, else the raw body, else the status.
fn repository_message(status: u16, body: &str) -> String {
    if let Some(message) = RepositoryErrorBody::parse(body).and_then(|b| b.message) {
        return message;
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    format!("repository returned status {status}")
}
