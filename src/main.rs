mod cli;

use nowplaying_notify::{
    artwork::{ArtworkSearchClient, HttpFetcher},
    config,
    events::{EventSource, JsonLinesSource},
    notifications, EnrichmentPipeline, EventListener, ListenerError,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

async fn listen(config_path: Option<&std::path::Path>, input: Option<PathBuf>) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override input from CLI if specified
    if input.is_some() {
        config.events.input = input;
    }

    let source: Arc<dyn EventSource> = match &config.events.input {
        Some(path) => {
            tracing::info!("Reading player events from {:?}", path);
            Arc::new(JsonLinesSource::file(path.clone()))
        }
        None => {
            tracing::info!("Reading player events from stdin");
            Arc::new(JsonLinesSource::stdin())
        }
    };
    let sink = notifications::create_sink(&config.sink);
    let pipeline = Arc::new(EnrichmentPipeline::from_config(&config));

    let listener = EventListener::new(source, sink, pipeline, config.events.topic.clone());
    let subscription = match listener.start().await {
        Ok(subscription) => subscription,
        // Already logged by the listener; nothing can be delivered.
        Err(ListenerError::Authorization(_)) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let join = subscription.join();
    tokio::pin!(join);

    tokio::select! {
        result = &mut join => {
            let received = result?;
            tracing::info!("Event source closed after {} events", received);
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}

async fn lookup(config_path: Option<&std::path::Path>, album: &str) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(
        config.search.request_timeout_secs,
    )));
    let client = ArtworkSearchClient::new(fetcher, &config.search.base_url, &config.search.country);

    match client.try_lookup(album).await? {
        Some(url) => println!("{}", url),
        None => println!("No artwork found for: {}", album),
    }

    Ok(())
}

fn validate(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    config::validate_config(&config)?;

    println!("Configuration is valid");
    println!("  Search API: {}", config.search.base_url);
    println!("  Topic: {}", config.events.topic);
    println!("  Sink: {:?}", config.sink.kind);
    println!(
        "  Artwork directory: {}",
        config.download.resolved_directory().display()
    );

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "nowplaying_notify=trace,reqwest=debug".to_string()
        } else {
            "nowplaying_notify=debug".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    match cli.command {
        Commands::Listen { input } => {
            let rt = tokio::runtime::Runtime::new()?;
            let result = rt.block_on(listen(cli.config.as_deref(), input));
            // The stdin reader blocks in a thread that cannot be interrupted;
            // don't wait for it on shutdown.
            rt.shutdown_background();
            result
        }
        Commands::Lookup { album } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(lookup(cli.config.as_deref(), &album))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate(path.as_deref())
        }
        Commands::Version => {
            println!("nowplaying-notify {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
