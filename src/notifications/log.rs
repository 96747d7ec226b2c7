use async_trait::async_trait;
use nowplaying_common::NotificationPayload;

use super::{AuthorizationError, DeliveryError, NotificationSink};

/// Sink that only logs notifications. Always authorized.
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn authorize(&self) -> Result<(), AuthorizationError> {
        Ok(())
    }

    async fn deliver(&self, payload: &NotificationPayload) -> Result<(), DeliveryError> {
        tracing::info!(
            identifier = %payload.identifier,
            title = %payload.title,
            body = %payload.body,
            attachment = ?payload.attachment_path,
            "Now playing"
        );
        Ok(())
    }
}
