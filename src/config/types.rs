use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub events: EventsConfig,

    #[serde(default)]
    pub sink: SinkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Base URL of the search API (no trailing `/search`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Storefront country code sent with every query
    #[serde(default = "default_country")]
    pub country: String,

    /// Timeout applied to every HTTP request, search and download alike
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_country() -> String {
    "us".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            country: default_country(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DownloadConfig {
    /// Where artwork files are written (defaults to the OS temp directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

impl DownloadConfig {
    pub fn resolved_directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(std::env::temp_dir)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventsConfig {
    /// Event topic to subscribe to
    #[serde(default = "default_topic")]
    pub topic: String,

    /// JSON-lines file to read events from (stdin when unset)
    #[serde(default)]
    pub input: Option<PathBuf>,
}

fn default_topic() -> String {
    "com.apple.Music.playerInfo".to_string()
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            topic: default_topic(),
            input: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Log notifications through tracing only
    #[default]
    Log,
    /// Run an external notifier program per notification
    Command,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SinkConfig {
    #[serde(default)]
    pub kind: SinkKind,

    /// Notifier program for the command sink
    #[serde(default = "default_program")]
    pub program: String,

    /// Application name passed to the notifier
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_program() -> String {
    "notify-send".to_string()
}

fn default_app_name() -> String {
    "nowplaying-notify".to_string()
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::default(),
            program: default_program(),
            app_name: default_app_name(),
        }
    }
}
