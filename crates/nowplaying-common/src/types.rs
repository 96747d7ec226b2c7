//! Player events and notification payloads.
//!
//! Player state strings follow the Music.app distributed notification
//! (`"Playing"`, `"Paused"`, `"Stopped"`); anything else maps to
//! [`PlayerState::Other`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

use crate::ids::NotificationId;

/// Key carrying the player state in the event payload.
pub const KEY_PLAYER_STATE: &str = "Player State";
/// Key carrying the artist name.
pub const KEY_ARTIST: &str = "Artist";
/// Key carrying the track title.
pub const KEY_NAME: &str = "Name";
/// Key carrying the album name.
pub const KEY_ALBUM: &str = "Album";

/// Playback state reported by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    Playing,
    Paused,
    Stopped,
    Other,
}

impl From<&str> for PlayerState {
    fn from(s: &str) -> Self {
        match s {
            "Playing" => Self::Playing,
            "Paused" => Self::Paused,
            "Stopped" => Self::Stopped,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// A single "player info changed" event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerChangeEvent {
    pub player_state: PlayerState,
    pub artist: Option<String>,
    pub track: Option<String>,
    pub album: Option<String>,
}

impl PlayerChangeEvent {
    /// Build an event from the player's key-value payload.
    ///
    /// Keys that are missing or carry a non-string value are treated as
    /// absent. A missing player state becomes [`PlayerState::Other`].
    pub fn from_user_info(info: &Map<String, Value>) -> Self {
        let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_owned);

        Self {
            player_state: info
                .get(KEY_PLAYER_STATE)
                .and_then(Value::as_str)
                .map(PlayerState::from)
                .unwrap_or(PlayerState::Other),
            artist: text(KEY_ARTIST),
            track: text(KEY_NAME),
            album: text(KEY_ALBUM),
        }
    }
}

/// Notification handed to the delivery sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Unique per delivery.
    pub identifier: NotificationId,
    /// Track title.
    pub title: String,
    /// `"{artist} - {album}"`.
    pub body: String,
    /// Downloaded artwork, if the lookup and download both succeeded.
    pub attachment_path: Option<PathBuf>,
}

impl NotificationPayload {
    /// Create a payload with a freshly generated identifier.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        attachment_path: Option<PathBuf>,
    ) -> Self {
        Self {
            identifier: NotificationId::new(),
            title: title.into(),
            body: body.into(),
            attachment_path,
        }
    }
}
