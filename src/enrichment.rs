//! Enrichment pipeline turning player events into notifications.
//!
//! The [`EnrichmentPipeline`] filters out events that are not a track start,
//! looks up album artwork, downloads it and assembles the
//! [`NotificationPayload`]. Artwork is best-effort: a failed lookup or
//! download only drops the attachment.

use std::sync::Arc;
use std::time::Duration;

use nowplaying_common::{NotificationPayload, PlayerChangeEvent, PlayerState};
use tracing::{debug, info};

use crate::artwork::{ArtworkDownloader, ArtworkSearchClient, Fetcher, HttpFetcher};
use crate::config::Config;

/// An event that passed the actionability filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackStart {
    pub artist: String,
    pub track: String,
    pub album: String,
}

impl TrackStart {
    /// Accept only `Playing` events carrying artist, track and album.
    pub fn from_event(event: PlayerChangeEvent) -> Option<Self> {
        if event.player_state != PlayerState::Playing {
            return None;
        }

        Some(Self {
            artist: event.artist?,
            track: event.track?,
            album: event.album?,
        })
    }

    fn body(&self) -> String {
        format!("{} - {}", self.artist, self.album)
    }
}

/// Stateless per-event enrichment.
///
/// Every call to [`handle`](Self::handle) works only on its own event, so
/// one pipeline can be shared by any number of concurrent tasks.
pub struct EnrichmentPipeline {
    search: ArtworkSearchClient,
    downloader: ArtworkDownloader,
}

impl EnrichmentPipeline {
    pub fn new(search: ArtworkSearchClient, downloader: ArtworkDownloader) -> Self {
        Self { search, downloader }
    }

    /// Build a pipeline whose search client and downloader share one HTTP
    /// client configured from `config`.
    pub fn from_config(config: &Config) -> Self {
        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(
            config.search.request_timeout_secs,
        )));

        let search = ArtworkSearchClient::new(
            fetcher.clone(),
            &config.search.base_url,
            &config.search.country,
        );
        let downloader =
            ArtworkDownloader::new(fetcher, config.download.resolved_directory());

        Self::new(search, downloader)
    }

    /// Produce a notification for `event`, or `None` if it is not a track
    /// start.
    pub async fn handle(&self, event: PlayerChangeEvent) -> Option<NotificationPayload> {
        let state = event.player_state;
        let Some(track) = TrackStart::from_event(event) else {
            debug!(state = %state, "Ignoring non-actionable player event");
            return None;
        };

        info!(
            artist = %track.artist,
            track = %track.track,
            album = %track.album,
            "Track started"
        );

        let attachment = match self.search.lookup(&track.album).await {
            Some(url) => self.downloader.download(&url).await,
            None => None,
        };

        let payload = NotificationPayload::new(track.track.clone(), track.body(), attachment);

        info!(
            identifier = %payload.identifier,
            has_artwork = payload.attachment_path.is_some(),
            "Enrichment complete"
        );

        Some(payload)
    }
}
