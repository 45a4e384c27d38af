//! Error types for the catalog gateway

use thiserror::Error;

/// Catalog gateway errors
#[derive(Error, Debug)]
pub enum CatalogError {
    /// API request returned an error status
    #[error("Catalog API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Failed to parse an API response
    #[error("Failed to parse catalog response: {0}")]
    ParseError(String),

    /// Network-level failure
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The configured base URL is unusable
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            CatalogError::ParseError(error.to_string())
        } else {
            CatalogError::NetworkError(error.to_string())
        }
    }
}

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
