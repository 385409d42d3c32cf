//! CLI argument definitions using clap
//!
//! Commands:
//! - dbmend repair <db> [--json]
//! - dbmend check <db> [--json]
//! - dbmend dump <db> [--out <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dbmend - backup, check, and rebuild a corrupt store file
#[derive(Parser, Debug)]
#[command(name = "dbmend")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the full repair pipeline: backup, check, and if corrupt
    /// dump, rebuild, and promote
    Repair {
        /// Path to the store file
        db: PathBuf,

        /// Print the run report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run the read-only integrity scan and report the verdict
    Check {
        /// Path to the store file
        db: PathBuf,

        /// Print the scan report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Write a best-effort logical dump without modifying the store
    Dump {
        /// Path to the store file
        db: PathBuf,

        /// Script path (default: `<db>.dump.sql.<stamp>` next to the store)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
