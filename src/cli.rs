//! CLI interface for cloudcarbon
//!
//! This module defines the command-line interface using clap, providing
//! a subcommand structure: `cloudcarbon <command> [flags]`.
//!
//! # Example
//!
//! ```bash
//! # Estimate January's footprint from a billing export, one bucket per day
//! cloudcarbon estimate --csv billing.csv --start 2024-01-01 --end 2024-01-31 --group-by day
//!
//! # Group each bucket by service, machine-readable output
//! cloudcarbon estimate --csv billing.csv --start 2024-01 --end 2024-01 --group service --json
//!
//! # Serve the HTTP API over the same export
//! cloudcarbon serve --csv billing.csv --port 8080
//!
//! # List the built-in emissions factors
//! cloudcarbon regions --provider aws
//! ```

use clap::{Args, Parser, Subcommand};

/// Estimate cloud energy use and carbon emissions from billing exports
#[derive(Parser, Debug, Clone)]
#[command(name = "cloudcarbon")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress informational output (only warnings and errors)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Cloud provider whose constants to use
    #[arg(long, default_value = "gcp", global = true)]
    pub provider: String,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by commands that read a billing export
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to a billing export CSV file
    #[arg(long, env = "CLOUDCARBON_CSV")]
    pub csv: std::path::PathBuf,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate the footprint for a date range
    Estimate {
        #[command(flatten)]
        source: SourceArgs,

        /// Start date (YYYY-MM-DD or YYYY-MM)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD or YYYY-MM)
        #[arg(long)]
        end: String,

        /// Time bucket granularity: day, week or month
        #[arg(long, default_value = "month")]
        group_by: String,

        /// Secondary grouping dimension: service, account or region
        #[arg(long)]
        group: Option<String>,

        /// Sort buckets chronologically instead of discovery order
        #[arg(long)]
        sorted: bool,
    },

    /// Serve the footprint HTTP API
    Serve {
        #[command(flatten)]
        source: SourceArgs,

        /// Port to listen on
        #[arg(long, short = 'p', default_value = "8080", env = "CLOUDCARBON_PORT")]
        port: u16,
    },

    /// List the built-in regional emissions factors
    Regions,
}
