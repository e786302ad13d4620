//! Internal store errors, mapped to the core port error at the boundary.

use std::path::PathBuf;

use thiserror::Error;

use devname_core::StorePortError;

/// Errors related to cache file persistence.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No platform data directory could be determined.
    #[error("no usable data directory for this platform")]
    NoDataDir,

    /// Creating the cache directory failed.
    #[error("failed to create {}: {source}", path.display())]
    CreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading a cache file failed for a reason other than absence.
    #[error("failed to read {}: {source}", path.display())]
    ReadFailed {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Parsing a cache file failed.
    #[error("failed to parse {}: {source}", path.display())]
    ParseFailed {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// Writing a cache file failed.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailed {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serializing a cache file failed.
    #[error("failed to serialize {what}: {source}")]
    Serialize {
        /// Which document was being serialized.
        what: &'static str,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Map to the core port error, collapsing path detail into the message.
    pub(crate) fn into_port_error(self, what: &'static str) -> StorePortError {
        match &self {
            Self::NoDataDir
            | Self::CreateFailed { .. }
            | Self::ReadFailed { .. }
            | Self::ParseFailed { .. } => StorePortError::Unavailable {
                message: self.to_string(),
            },
            Self::WriteFailed { .. } | Self::Serialize { .. } => StorePortError::WriteFailed {
                what,
                message: self.to_string(),
            },
        }
    }
}
