//! Album artwork lookup against the iTunes Search API.
//!
//! One query per album, asking the API for its single best match. Only the
//! first result is considered and its 100px artwork is preferred over the
//! 60px one.

use std::sync::Arc;

use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, warn};

use super::fetch::{FetchError, Fetcher};

// ---------------------------------------------------------------------------
// Search API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct AlbumSearchResponse {
    results: Vec<AlbumResult>,
}

#[derive(Debug, Deserialize)]
struct AlbumResult {
    #[serde(rename = "artworkUrl60")]
    artwork_url_60: Option<String>,
    #[serde(rename = "artworkUrl100")]
    artwork_url_100: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a lookup produced no artwork URL.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("could not build search URL from {base}: {source}")]
    InvalidBaseUrl {
        base: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Looks up album artwork URLs.
///
/// Errors never escape [`lookup`](Self::lookup): a missing or failed lookup
/// only means the notification goes out without artwork.
pub struct ArtworkSearchClient {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    country: String,
}

impl ArtworkSearchClient {
    /// Create a client querying `{base_url}/search`.
    pub fn new(fetcher: Arc<dyn Fetcher>, base_url: &str, country: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
        }
    }

    /// Find the best artwork URL for `album_name`, or `None`.
    pub async fn lookup(&self, album_name: &str) -> Option<Url> {
        match self.try_lookup(album_name).await {
            Ok(Some(url)) => {
                debug!(album = album_name, artwork = %url, "Found artwork");
                Some(url)
            }
            Ok(None) => {
                debug!(album = album_name, "No artwork in search response");
                None
            }
            Err(e) => {
                warn!(album = album_name, error = %e, "Artwork lookup failed");
                None
            }
        }
    }

    /// Same as [`lookup`](Self::lookup) but reports why nothing was found.
    pub async fn try_lookup(&self, album_name: &str) -> Result<Option<Url>, LookupError> {
        let url = self.search_url(album_name)?;
        debug!(url = %url, "Searching album artwork");

        let body = self.fetcher.fetch(&url).await?;
        let response: AlbumSearchResponse = serde_json::from_slice(&body)?;

        Ok(select_artwork(response))
    }

    /// Build the search query URL for an album.
    fn search_url(&self, album_name: &str) -> Result<Url, LookupError> {
        let base = format!("{}/search", self.base_url);
        Url::parse_with_params(
            &base,
            &[
                ("country", self.country.as_str()),
                ("entity", "album"),
                ("limit", "1"),
                ("media", "music"),
                ("term", album_name),
            ],
        )
        .map_err(|source| LookupError::InvalidBaseUrl { base, source })
    }
}

/// Pick the artwork URL from the first result, 100px before 60px.
///
/// A field that does not parse as a URL is treated as absent.
fn select_artwork(response: AlbumSearchResponse) -> Option<Url> {
    let first = response.results.into_iter().next()?;

    [first.artwork_url_100, first.artwork_url_60]
        .into_iter()
        .flatten()
        .find_map(|candidate| Url::parse(&candidate).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> AlbumSearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn prefers_high_resolution() {
        let response = parse(
            r#"{"results":[{"artworkUrl60":"http://a/60.jpg","artworkUrl100":"http://a/100.jpg"}]}"#,
        );
        assert_eq!(select_artwork(response).unwrap().as_str(), "http://a/100.jpg");
    }

    #[test]
    fn falls_back_to_low_resolution() {
        let response = parse(r#"{"results":[{"artworkUrl60":"http://a/60.jpg"}]}"#);
        assert_eq!(select_artwork(response).unwrap().as_str(), "http://a/60.jpg");
    }

    #[test]
    fn unparseable_high_resolution_falls_back() {
        let response = parse(
            r#"{"results":[{"artworkUrl60":"http://a/60.jpg","artworkUrl100":"not a url"}]}"#,
        );
        assert_eq!(select_artwork(response).unwrap().as_str(), "http://a/60.jpg");
    }

    #[test]
    fn neither_field_yields_none() {
        let response = parse(r#"{"results":[{"collectionName":"Z"}]}"#);
        assert!(select_artwork(response).is_none());
    }

    #[test]
    fn empty_results_yield_none() {
        assert!(select_artwork(parse(r#"{"results":[]}"#)).is_none());
    }

    #[test]
    fn only_first_result_is_used() {
        let response = parse(
            r#"{"results":[{"collectionName":"first"},{"artworkUrl100":"http://a/second.jpg"}]}"#,
        );
        assert!(select_artwork(response).is_none());
    }

    #[test]
    fn search_url_has_expected_query() {
        struct Unused;

        #[async_trait::async_trait]
        impl Fetcher for Unused {
            async fn fetch(&self, _url: &Url) -> Result<bytes::Bytes, FetchError> {
                unreachable!("search_url does not fetch")
            }
        }

        let client = ArtworkSearchClient::new(Arc::new(Unused), "https://itunes.apple.com/", "us");
        let url = client.search_url("In Decay & Other").unwrap();

        assert_eq!(url.path(), "/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("country".to_string(), "us".to_string()),
                ("entity".to_string(), "album".to_string()),
                ("limit".to_string(), "1".to_string()),
                ("media".to_string(), "music".to_string()),
                ("term".to_string(), "In Decay & Other".to_string()),
            ]
        );
    }
}
