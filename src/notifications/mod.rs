pub mod command;
pub mod log;

pub use command::CommandSink;
pub use log::LogSink;

use async_trait::async_trait;
use nowplaying_common::NotificationPayload;
use std::sync::Arc;

use crate::config::{SinkConfig, SinkKind};

/// The sink refused or failed the permission handshake.
#[derive(Debug, thiserror::Error)]
pub enum AuthorizationError {
    #[error("notification permission denied")]
    Denied,

    #[error("notification authorization failed: {0}")]
    Failed(String),
}

/// A single notification could not be delivered.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("failed to run notifier: {0}")]
    Io(#[from] std::io::Error),

    #[error("notifier exited with code {code:?}: {stderr}")]
    Rejected { code: Option<i32>, stderr: String },
}

/// Destination for notifications.
///
/// `authorize` must succeed before the listener subscribes to events.
/// Delivery failures are logged by the caller and never retried.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short identifier used in logs (e.g. `"log"`).
    fn name(&self) -> &'static str;

    async fn authorize(&self) -> Result<(), AuthorizationError>;

    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), DeliveryError>;
}

/// Create the sink selected in config
pub fn create_sink(config: &SinkConfig) -> Arc<dyn NotificationSink> {
    match config.kind {
        SinkKind::Log => Arc::new(LogSink),
        SinkKind::Command => Arc::new(CommandSink::new(&config.program, &config.app_name)),
    }
}
