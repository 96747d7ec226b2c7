//! Nowplaying-notify - desktop notifications with album artwork
//!
//! This library crate exposes the core functionality for integration testing.

pub mod artwork;
pub mod config;
pub mod enrichment;
pub mod events;
pub mod listener;
pub mod notifications;

pub use enrichment::EnrichmentPipeline;
pub use listener::{EventListener, ListenerError, Subscription};
