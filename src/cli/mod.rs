use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// `snapthin` - tiered time-decay thinning for Elasticsearch snapshot repositories.
#[derive(Parser, Debug)]
#[command(name = "snapthin")]
#[command(version)]
#[command(
    about = "Keep recent snapshots densely, older ones sparsely, and delete the rest.",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (default: ~/.snapthin/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Elasticsearch endpoint, overrides the config file
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Snapshot repository, overrides the config file
    #[arg(long, global = true)]
    pub repository: Option<String>,

    /// Snapshot name prefix, overrides the config file
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which snapshots would be kept and deleted
    Plan {
        /// Reference instant, e.g. 2024-06-01T04:16 (default: local time now)
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
    },

    /// Show the proposal, ask for confirmation, then delete and clean up
    Thin {
        /// Reference instant, e.g. 2024-06-01T04:16 (default: local time now)
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

const NOW_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    NOW_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw.trim(), format).ok())
        .ok_or_else(|| format!("invalid instant {raw:?}, expected YYYY-MM-DDTHH:MM"))
}
