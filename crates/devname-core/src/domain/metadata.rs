//! Revalidation metadata persisted alongside the cached table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque revalidation token returned by the remote endpoint.
///
/// The token is echoed back verbatim on the next conditional request:
/// an `ETag` as `If-None-Match`, a `Last-Modified` timestamp string as
/// `If-Modified-Since`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Validator {
    /// `ETag` response header value.
    ETag(String),
    /// `Last-Modified` response header value.
    LastModified(String),
}

/// Metadata driving revalidation throttling.
///
/// Advanced on every successful remote check, whether or not the table
/// contents changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Validator from the last refresh that produced one, if any.
    pub validator: Option<Validator>,
    /// When the remote endpoint was last checked successfully, in UTC.
    /// `None` means never checked; the next trigger is due immediately.
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl CacheMetadata {
    /// Metadata for a freshly seeded store: no validator, never checked.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_metadata_is_zeroed() {
        let metadata = CacheMetadata::initial();
        assert!(metadata.validator.is_none());
        assert!(metadata.last_checked_at.is_none());
    }

    #[test]
    fn validator_roundtrips_through_serde() {
        let validator = Validator::ETag("\"abc123\"".to_string());
        let json = serde_json::to_string(&validator).unwrap();
        let back: Validator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, validator);

        let validator = Validator::LastModified("Wed, 21 Oct 2015 07:28:00 GMT".to_string());
        let json = serde_json::to_string(&validator).unwrap();
        let back: Validator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, validator);
    }
}
