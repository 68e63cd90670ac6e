use thiserror::Error;

/// Core error types for Hydrolink domain logic
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid manifest URL: {0}")]
    InvalidManifestUrl(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new InvalidManifestUrl error
    pub fn invalid_manifest_url(url: impl Into<String>) -> Self {
        Self::InvalidManifestUrl(url.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
