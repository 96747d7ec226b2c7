mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./nowplaying-notify.toml",
        "~/.config/nowplaying-notify/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    reqwest::Url::parse(&config.search.base_url)
        .with_context(|| format!("Invalid search base_url: {}", config.search.base_url))?;

    if config.search.request_timeout_secs == 0 {
        anyhow::bail!("search.request_timeout_secs cannot be 0");
    }

    if config.events.topic.trim().is_empty() {
        anyhow::bail!("events.topic cannot be empty");
    }

    if config.sink.kind == SinkKind::Command && config.sink.program.trim().is_empty() {
        anyhow::bail!("Command sink is selected but sink.program is empty");
    }

    if let Some(dir) = &config.download.directory {
        if !dir.is_dir() {
            tracing::warn!("Download directory does not exist: {:?}", dir);
        }
    }

    Ok(())
}
