//! Internal fetch errors, mapped to the core port error at the boundary.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Errors related to fetching the remote table document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The endpoint answered with a non-success, non-304 status.
    #[error("table request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Network or HTTP client error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not a valid table document.
    #[error("invalid table document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    /// Endpoint URL parsing error.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_message_carries_status_and_url() {
        let error = FetchError::RequestFailed {
            status: 503,
            url: "https://example.com/devices.json".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("example.com"));
    }
}
