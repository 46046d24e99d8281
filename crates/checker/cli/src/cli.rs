//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "keybox-check")]
#[command(
    about = "Check keybox files for certificate validity against the attestation status list (only .xml files)",
    long_about = None
)]
pub struct Cli {
    /// Directory containing keybox files
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Config file (default: <config dir>/keybox-check/config.toml)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Status list URL
    #[arg(long)]
    pub url: Option<String>,

    /// Read the status list from a local JSON file instead of fetching it
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    pub status_file: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report only; do not move valid keyboxes
    #[arg(long)]
    pub no_move: bool,

    /// Name of the subdirectory valid keyboxes are moved into
    #[arg(long, value_name = "NAME")]
    pub destination: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.status_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(destination) = &self.destination {
            config.destination_dir = destination.clone();
        }
        if self.no_move {
            config.move_valid = false;
        }
        config
    }

    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Log filter: `RUST_LOG` when it holds valid directives, otherwise the
    /// `-v` level.
    pub fn env_filter(&self) -> EnvFilter {
        self.filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref())
    }

    fn filter_from(&self, directives: Option<&str>) -> EnvFilter {
        directives
            .filter(|d| !d.trim().is_empty())
            .and_then(|d| EnvFilter::try_new(d).ok())
            .unwrap_or_else(|| EnvFilter::default().add_directive(self.log_level().into()))
    }
}
