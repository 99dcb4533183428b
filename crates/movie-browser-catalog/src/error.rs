use thiserror::Error;

/// Failures talking to the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("movie not found: {0}")]
    NotFound(String),

    #[error("failed to decode catalog response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("catalog request timed out")]
    Timeout,

    #[error("invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),
}

impl CatalogError {
    /// Transient errors are worth retrying later; a missing movie is not.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Http(_) | CatalogError::Timeout => true,
            CatalogError::Status { status, .. } => *status >= 500 || *status == 429,
            CatalogError::NotFound(_)
            | CatalogError::Decode(_)
            | CatalogError::InvalidBaseUrl(_) => false,
        }
    }
}
