//! Conditional GET of the remote table document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{self, HeaderMap};
use url::Url;

use devname_core::{FetchOutcome, FetchPortError, TableDocument, TableFetchPort, Validator};

use crate::error::{FetchError, FetchResult};

/// Upstream location of the maintained device table.
pub const DEFAULT_ENDPOINT: &str = "https://raw.githubusercontent.com/stephanheilner/UIDevice-DisplayName/main/Sources/UIDevice-DisplayName/Resources/devices.json";

/// Fetcher configuration.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Endpoint serving the table document.
    pub endpoint: String,
    /// Transport timeout; this also bounds fire-and-forget background
    /// checks, which are never cancelled explicitly.
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Production fetcher using reqwest.
///
/// One request per check, no transport-level retries: a failed check is
/// simply retried at the caller's next natural trigger.
pub struct ReqwestTableFetcher {
    client: reqwest::Client,
    endpoint: Url,
}

impl ReqwestTableFetcher {
    /// Create a fetcher. Fails only on an unparsable endpoint URL.
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to create HTTP client");

        Ok(Self { client, endpoint })
    }

    async fn fetch_inner(&self, validator: Option<&Validator>) -> FetchResult<FetchOutcome> {
        let mut request = self.client.get(self.endpoint.clone());
        if let Some(validator) = validator {
            let (name, value) = conditional_header(validator);
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            tracing::debug!(url = %self.endpoint, "Remote table not modified");
            return Ok(FetchOutcome::NotModified);
        }
        if !status.is_success() {
            return Err(FetchError::RequestFailed {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let validator = response_validator(response.headers());
        // Parse outside of reqwest's `json()` so a bad body surfaces as a
        // document error, not a transport error.
        let body = response.bytes().await?;
        let document: TableDocument = serde_json::from_slice(&body)?;

        tracing::debug!(
            url = %self.endpoint,
            families = document.device_types.len(),
            has_validator = validator.is_some(),
            "Fetched updated table document"
        );
        Ok(FetchOutcome::Updated {
            document,
            validator,
        })
    }
}

#[async_trait]
impl TableFetchPort for ReqwestTableFetcher {
    async fn fetch(&self, validator: Option<&Validator>) -> Result<FetchOutcome, FetchPortError> {
        self.fetch_inner(validator).await.map_err(map_error)
    }
}

/// Conditional request header for a stored validator.
fn conditional_header(validator: &Validator) -> (&'static str, &str) {
    match validator {
        Validator::ETag(value) => ("If-None-Match", value.as_str()),
        Validator::LastModified(value) => ("If-Modified-Since", value.as_str()),
    }
}

/// Validator advertised by a response: `ETag` preferred, `Last-Modified` as
/// the fallback representation of the same concept.
fn response_validator(headers: &HeaderMap) -> Option<Validator> {
    let header_value = |name| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    header_value(header::ETAG)
        .map(Validator::ETag)
        .or_else(|| header_value(header::LAST_MODIFIED).map(Validator::LastModified))
}

/// Convert internal `FetchError` to the core port error.
fn map_error(error: FetchError) -> FetchPortError {
    match error {
        FetchError::RequestFailed { status, url } => FetchPortError::RequestFailed { status, url },
        FetchError::Network(e) => FetchPortError::Network {
            message: e.to_string(),
        },
        FetchError::InvalidDocument(e) => FetchPortError::InvalidDocument {
            message: e.to_string(),
        },
        FetchError::InvalidUrl(e) => FetchPortError::Configuration {
            message: e.to_string(),
        },
    }
}
