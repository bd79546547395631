//! Structured error body returned by the repository.

use serde::{Deserialize, Serialize};

/// The JSON body of a rejected repository request.
///
/// ```json
/// { "message": "Resource already exists", "status": 409 }
/// ```
///
/// Only `message` is surfaced to the host; unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RepositoryErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl RepositoryErrorBody {
    /// Parse `body`; `None` if it is not a JSON object.
    pub fn parse(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }
}
