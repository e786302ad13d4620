//! Conditional HTTP fetcher for the devname lookup table.
//!
//! Implements the core `TableFetchPort` with a single conditional GET per
//! check: the stored validator rides out as `If-None-Match` or
//! `If-Modified-Since`, a 304 comes back as `FetchOutcome::NotModified`, and
//! a 200 is parsed into the wire document with the response's `ETag` (or
//! `Last-Modified`) captured for next time.

mod error;
mod fetch;

pub use error::FetchError;
pub use fetch::{DEFAULT_ENDPOINT, FetchConfig, ReqwestTableFetcher};
