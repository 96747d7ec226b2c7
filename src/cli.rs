use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nowplaying-notify")]
#[command(author, version, about = "Now-playing notifications with album artwork")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Listen for player changes and deliver notifications
    Listen {
        /// Read events from this JSON-lines file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Look up the artwork URL for an album
    Lookup {
        /// Album name to search for
        #[arg(required = true)]
        album: String,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_listen_with_input() {
        let cli = Cli::try_parse_from(["nowplaying-notify", "-v", "listen", "--input", "events.jsonl"])
            .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Listen { input: Some(ref p) } if p == &PathBuf::from("events.jsonl")
        ));
    }

    #[test]
    fn lookup_requires_album() {
        assert!(Cli::try_parse_from(["nowplaying-notify", "lookup"]).is_err());
    }

    #[test]
    fn global_config_flag() {
        let cli =
            Cli::try_parse_from(["nowplaying-notify", "version", "--config", "np.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("np.toml")));
    }
}
