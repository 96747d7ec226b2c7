//! Player event sources.
//!
//! An [`EventSource`] delivers [`PlayerChangeEvent`]s for one named topic
//! over a channel. [`JsonLinesSource`] reads them as newline-delimited JSON.

mod json_lines;

pub use json_lines::JsonLinesSource;

use async_trait::async_trait;
use nowplaying_common::PlayerChangeEvent;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// Channel capacity between a source and the listener.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum SubscribeError {
    #[error("failed to open event input {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("event source supports a single subscription")]
    AlreadySubscribed,
}

/// Subscription to a stream of player change events.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Start delivering events published under `topic`.
    ///
    /// The channel closes when the source is exhausted.
    async fn subscribe(
        &self,
        topic: &str,
    ) -> Result<mpsc::Receiver<PlayerChangeEvent>, SubscribeError>;
}
