use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use nowplaying_common::PlayerChangeEvent;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use super::{EventSource, SubscribeError, EVENT_CHANNEL_CAPACITY};

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// One line of input, shaped like a distributed notification.
#[derive(Debug, Deserialize)]
struct RawNotification {
    name: String,
    #[serde(rename = "userInfo", default)]
    user_info: Map<String, Value>,
}

enum Input {
    Stdin,
    File(PathBuf),
    Reader(BoxedReader),
}

/// Event source reading newline-delimited JSON notifications:
///
/// ```text
/// {"name": "com.apple.Music.playerInfo", "userInfo": {"Player State": "Playing", "Artist": "X", "Name": "Y", "Album": "Z"}}
/// ```
///
/// Lines for other topics are skipped; malformed lines are logged and
/// skipped.
pub struct JsonLinesSource {
    input: Mutex<Option<Input>>,
}

impl JsonLinesSource {
    pub fn stdin() -> Self {
        Self::with_input(Input::Stdin)
    }

    pub fn file(path: PathBuf) -> Self {
        Self::with_input(Input::File(path))
    }

    pub fn from_reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        Self::with_input(Input::Reader(Box::new(reader)))
    }

    fn with_input(input: Input) -> Self {
        Self {
            input: Mutex::new(Some(input)),
        }
    }

    fn take_input(&self) -> Option<Input> {
        match self.input.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

#[async_trait]
impl EventSource for JsonLinesSource {
    async fn subscribe(
        &self,
        topic: &str,
    ) -> Result<mpsc::Receiver<PlayerChangeEvent>, SubscribeError> {
        let reader: BoxedReader = match self.take_input() {
            None => return Err(SubscribeError::AlreadySubscribed),
            Some(Input::Stdin) => Box::new(tokio::io::stdin()),
            Some(Input::Reader(reader)) => reader,
            Some(Input::File(path)) => match tokio::fs::File::open(&path).await {
                Ok(file) => Box::new(file),
                Err(source) => return Err(SubscribeError::Open { path, source }),
            },
        };

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let topic = topic.to_string();

        tokio::spawn(async move {
            let mut lines = BufReader::new(reader).lines();
            let mut line_number = 0usize;

            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Failed to read event input: {}", e);
                        break;
                    }
                };
                line_number += 1;

                if let Some(event) = parse_line(&line, &topic, line_number) {
                    if tx.send(event).await.is_err() {
                        break;
                    }
                }
            }

            tracing::debug!(topic = %topic, lines = line_number, "Event input exhausted");
        });

        Ok(rx)
    }
}

fn parse_line(line: &str, topic: &str, line_number: usize) -> Option<PlayerChangeEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let raw: RawNotification = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(line = line_number, error = %e, "Skipping malformed event");
            return None;
        }
    };

    if raw.name != topic {
        tracing::trace!(line = line_number, name = %raw.name, "Skipping event for other topic");
        return None;
    }

    Some(PlayerChangeEvent::from_user_info(&raw.user_info))
}
