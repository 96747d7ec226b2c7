//! Best-effort album artwork: search, then download.
//!
//! - [`fetch`] -- the injected network capability.
//! - [`search`] -- album artwork URL lookup.
//! - [`download`] -- download to a uniquely named local file.

pub mod download;
pub mod fetch;
pub mod search;

pub use download::{ArtworkDownloader, DownloadError, DownloadedArtifact};
pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use search::{ArtworkSearchClient, LookupError};
