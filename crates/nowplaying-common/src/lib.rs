//! Nowplaying-Common: Shared types for the now-playing notifier.
//!
//! This crate provides the data model passed between the event source, the
//! enrichment pipeline and the notification sink:
//!
//! - **Typed IDs**: UUID wrapper identifying a single notification delivery
//! - **Player events**: [`PlayerChangeEvent`] and [`PlayerState`], built from
//!   the player's key-value payload
//! - **Notifications**: [`NotificationPayload`] handed to the delivery sink
//!
//! # Examples
//!
//! ```
//! use nowplaying_common::{PlayerChangeEvent, PlayerState};
//!
//! let info = serde_json::json!({
//!     "Player State": "Playing",
//!     "Artist": "Boards of Canada",
//!     "Name": "Roygbiv",
//!     "Album": "Music Has the Right to Children",
//! });
//! let event = PlayerChangeEvent::from_user_info(info.as_object().unwrap());
//! assert_eq!(event.player_state, PlayerState::Playing);
//! assert_eq!(event.track.as_deref(), Some("Roygbiv"));
//! ```

pub mod ids;
pub mod types;

pub use ids::*;
pub use types::*;
