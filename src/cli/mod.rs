pub mod breakdown;
pub mod init;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fcstat",
    version,
    about = "Profit/loss summaries from Funding Circle monthly statements."
)]
pub struct Cli {
    /// Disable coloured output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise a statement CSV, or every statement CSV in a directory.
    Report {
        /// Statement file or directory (default: configured statements dir, then .)
        path: Option<String>,
    },
    /// Show how each row of a statement was classified.
    Breakdown {
        /// Statement CSV file
        file: String,
    },
    /// Write settings: currency symbol, platform name, default statements dir.
    Init {
        /// Default directory for `fcstat report`
        #[arg(long = "statements-dir")]
        statements_dir: Option<String>,
        /// Currency symbol shown before amounts
        #[arg(long)]
        currency: Option<String>,
        /// Platform name used in transfer lines
        #[arg(long)]
        platform: Option<String>,
    },
    /// Show current settings and the statements they point at.
    Status,
}
