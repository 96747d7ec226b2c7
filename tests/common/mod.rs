//! Shared test harness for integration tests.
//!
//! Provides fake collaborators ([`ChannelSource`], [`RecordingSink`]) and
//! helpers that build an [`EnrichmentPipeline`] against a wiremock server.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nowplaying_common::{NotificationPayload, PlayerChangeEvent, PlayerState};
use nowplaying_notify::artwork::{ArtworkDownloader, ArtworkSearchClient, Fetcher, HttpFetcher};
use nowplaying_notify::events::{EventSource, SubscribeError};
use nowplaying_notify::notifications::{AuthorizationError, DeliveryError, NotificationSink};
use nowplaying_notify::EnrichmentPipeline;
use tokio::sync::mpsc;

pub const TOPIC: &str = "com.apple.Music.playerInfo";

/// Build a player event.
pub fn event(state: PlayerState, artist: &str, track: &str, album: &str) -> PlayerChangeEvent {
    PlayerChangeEvent {
        player_state: state,
        artist: Some(artist.to_string()),
        track: Some(track.to_string()),
        album: Some(album.to_string()),
    }
}

/// Pipeline whose search API is `base_url` and whose downloads land in `dir`.
pub fn pipeline(base_url: &str, dir: &Path) -> EnrichmentPipeline {
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new(Duration::from_secs(5)));
    EnrichmentPipeline::new(
        ArtworkSearchClient::new(fetcher.clone(), base_url, "us"),
        ArtworkDownloader::new(fetcher, dir.to_path_buf()),
    )
}

// ---------------------------------------------------------------------------
// Event source
// ---------------------------------------------------------------------------

/// Event source fed by the test through an mpsc sender.
pub struct ChannelSource {
    receiver: Mutex<Option<mpsc::Receiver<PlayerChangeEvent>>>,
    subscriptions: AtomicUsize,
}

impl ChannelSource {
    pub fn new() -> (Arc<Self>, mpsc::Sender<PlayerChangeEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let source = Arc::new(Self {
            receiver: Mutex::new(Some(rx)),
            subscriptions: AtomicUsize::new(0),
        });
        (source, tx)
    }

    pub fn subscriptions(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventSource for ChannelSource {
    async fn subscribe(
        &self,
        topic: &str,
    ) -> Result<mpsc::Receiver<PlayerChangeEvent>, SubscribeError> {
        assert_eq!(topic, TOPIC);
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        self.receiver
            .lock()
            .unwrap()
            .take()
            .ok_or(SubscribeError::AlreadySubscribed)
    }
}

// ---------------------------------------------------------------------------
// Notification sink
// ---------------------------------------------------------------------------

/// Sink recording every delivered payload.
#[derive(Default)]
pub struct RecordingSink {
    deny: bool,
    fail_delivery: bool,
    delivered: Mutex<Vec<NotificationPayload>>,
}

impl RecordingSink {
    pub fn granting() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn denying() -> Arc<Self> {
        Arc::new(Self {
            deny: true,
            ..Self::default()
        })
    }

    pub fn failing_delivery() -> Arc<Self> {
        Arc::new(Self {
            fail_delivery: true,
            ..Self::default()
        })
    }

    pub fn delivered(&self) -> Vec<NotificationPayload> {
        self.delivered.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn authorize(&self) -> Result<(), AuthorizationError> {
        if self.deny {
            Err(AuthorizationError::Denied)
        } else {
            Ok(())
        }
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), DeliveryError> {
        self.delivered.lock().unwrap().push(payload.clone());
        if self.fail_delivery {
            return Err(DeliveryError::Rejected {
                code: Some(1),
                stderr: "sink unavailable".to_string(),
            });
        }
        Ok(())
    }
}
