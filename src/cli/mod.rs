//! CLI module for dbmend
//!
//! Provides the command-line interface:
//! - repair: full pipeline (backup, check, dump, rebuild, promote)
//! - check: read-only integrity scan
//! - dump: best-effort logical dump

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, dump, repair, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
