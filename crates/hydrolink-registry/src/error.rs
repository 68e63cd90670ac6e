use thiserror::Error;

/// Errors raised by registry clients.
///
/// Most of these never escape the engine: read failures collapse to empty
/// listings and write failures collapse to per-artifact failure results.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RegistryError {
    pub fn unexpected_status(status: u16, url: impl Into<String>) -> Self {
        Self::UnexpectedStatus {
            status,
            url: url.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unexpected_status_message() {
        let err = RegistryError::unexpected_status(500, "https://geo.example.org/rest/workspaces");
        assert_eq!(
            err.to_string(),
            "Unexpected status 500 from https://geo.example.org/rest/workspaces"
        );
    }
}
