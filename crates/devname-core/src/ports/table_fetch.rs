//! Remote table fetch port definition.

use async_trait::async_trait;
use thiserror::Error;

use crate::contracts::TableDocument;
use crate::domain::Validator;

/// Errors from a remote revalidation attempt.
#[derive(Debug, Error)]
pub enum FetchPortError {
    /// The endpoint answered with a non-success, non-304 status.
    #[error("table request failed with status {status}: {url}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// Transport-level failure (timeout, DNS, TLS).
    #[error("network error: {message}")]
    Network {
        /// Description of the failure.
        message: String,
    },

    /// The response body was not a valid table document.
    ///
    /// The caller leaves `last_checked_at` untouched on this error so the
    /// next natural trigger retries instead of waiting out a full
    /// cool-down.
    #[error("invalid table document: {message}")]
    InvalidDocument {
        /// Description of what was invalid.
        message: String,
    },

    /// The fetcher itself is misconfigured (e.g. a bad endpoint URL).
    #[error("fetcher misconfigured: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },
}

/// Outcome of a successful conditional fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Remote content matches the presented validator; nothing to apply.
    NotModified,
    /// Remote content changed.
    Updated {
        /// The parsed replacement document.
        document: TableDocument,
        /// Validator to present on the next check, if the endpoint sent one.
        validator: Option<Validator>,
    },
}

/// Port for conditional revalidation against the remote endpoint.
#[async_trait]
pub trait TableFetchPort: Send + Sync {
    /// Issue one conditional request carrying `validator`.
    ///
    /// Implementations make a single attempt; retry policy belongs to the
    /// caller's trigger schedule, not the transport.
    async fn fetch(&self, validator: Option<&Validator>) -> Result<FetchOutcome, FetchPortError>;
}
