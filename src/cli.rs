use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::request::RetentionRequest;
use crate::types::RetentionMode;

/// repo-retention - manage object-lock retention of a backup repository
#[derive(Parser, Debug)]
#[command(name = "repo-retention")]
#[command(about = "Reconcile immutability settings for a backup repository")]
#[command(version)]
pub struct Cli {
    /// Log filter (e.g. "info,repo_retention=debug"); overrides RUST_LOG
    #[arg(long, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a state file with retention disabled, then apply any flags
    Init {
        /// Path to the repository state file
        #[arg(short, long)]
        state: PathBuf,

        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,

        #[command(flatten)]
        retention: RetentionFlags,
    },
    /// Change retention settings of an existing repository
    Set {
        /// Path to the repository state file
        #[arg(short, long)]
        state: PathBuf,

        #[command(flatten)]
        retention: RetentionFlags,
    },
    /// Print the stored retention records
    Show {
        /// Path to the repository state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Check that the stored records are consistent
    Verify {
        /// Path to the repository state file
        #[arg(short, long)]
        state: PathBuf,
    },
}

/// Retention flags; any flag left out keeps the stored value
#[derive(Args, Debug, Clone, Default)]
pub struct RetentionFlags {
    /// Immutability level (none, governance, compliance)
    #[arg(long, value_name = "MODE")]
    pub retention_mode: Option<RetentionMode>,

    /// Minimum lock period (e.g. "48h", "30days")
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub retention_duration: Option<Duration>,

    /// Extend object locks during full maintenance
    #[arg(long, value_name = "BOOL")]
    pub extend_retention: Option<bool>,
}

impl RetentionFlags {
    pub fn to_request(&self) -> RetentionRequest {
        RetentionRequest {
            mode: self.retention_mode,
            duration: self.retention_duration,
            extend: self.extend_retention,
        }
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| e.to_string())
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
