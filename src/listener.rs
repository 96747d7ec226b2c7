//! Event listener wiring the source, the pipeline and the sink together.
//!
//! After the sink grants authorization the listener subscribes to the event
//! topic and spawns one task per event. Tasks are never awaited before the
//! next event is accepted, so completions (and deliveries) may arrive out of
//! order.

use std::sync::Arc;

use nowplaying_common::PlayerChangeEvent;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::enrichment::EnrichmentPipeline;
use crate::events::{EventSource, SubscribeError};
use crate::notifications::{AuthorizationError, NotificationSink};

#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error(transparent)]
    Subscribe(#[from] SubscribeError),
}

/// Listens for player changes and delivers enriched notifications.
pub struct EventListener {
    source: Arc<dyn EventSource>,
    sink: Arc<dyn NotificationSink>,
    pipeline: Arc<EnrichmentPipeline>,
    topic: String,
}

impl EventListener {
    pub fn new(
        source: Arc<dyn EventSource>,
        sink: Arc<dyn NotificationSink>,
        pipeline: Arc<EnrichmentPipeline>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            source,
            sink,
            pipeline,
            topic: topic.into(),
        }
    }

    /// Authorize with the sink, then subscribe and start dispatching.
    ///
    /// Nothing is subscribed when authorization fails.
    pub async fn start(self) -> Result<Subscription, ListenerError> {
        if let Err(e) = self.sink.authorize().await {
            error!(
                sink = self.sink.name(),
                error = %e,
                "Notification authorization failed; not subscribing to player events"
            );
            return Err(e.into());
        }

        let events = self.source.subscribe(&self.topic).await?;
        info!(topic = %self.topic, sink = self.sink.name(), "Listening for player changes");

        let handle = tokio::spawn(dispatch(events, self.pipeline, self.sink));
        Ok(Subscription { handle })
    }
}

/// Running dispatch loop returned by [`EventListener::start`].
pub struct Subscription {
    handle: JoinHandle<usize>,
}

impl Subscription {
    /// Wait until the source is exhausted and every in-flight event has been
    /// handled. Returns the number of events received.
    pub async fn join(self) -> Result<usize, JoinError> {
        self.handle.await
    }
}

async fn dispatch(
    mut events: mpsc::Receiver<PlayerChangeEvent>,
    pipeline: Arc<EnrichmentPipeline>,
    sink: Arc<dyn NotificationSink>,
) -> usize {
    let mut tasks = JoinSet::new();
    let mut received = 0usize;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    received += 1;
                    tasks.spawn(enrich_and_deliver(event, pipeline.clone(), sink.clone()));
                }
                None => break,
            },
            Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                log_task_result(result);
            }
        }
    }

    debug!(in_flight = tasks.len(), "Event source closed; draining");
    while let Some(result) = tasks.join_next().await {
        log_task_result(result);
    }

    received
}

async fn enrich_and_deliver(
    event: PlayerChangeEvent,
    pipeline: Arc<EnrichmentPipeline>,
    sink: Arc<dyn NotificationSink>,
) {
    let Some(payload) = pipeline.handle(event).await else {
        return;
    };

    match sink.deliver(&payload).await {
        Ok(()) => debug!(identifier = %payload.identifier, "Delivered notification"),
        Err(e) => warn!(
            identifier = %payload.identifier,
            error = %e,
            "Error delivering notification"
        ),
    }
}

fn log_task_result(result: Result<(), JoinError>) {
    if let Err(e) = result {
        warn!("Event task failed: {}", e);
    }
}
