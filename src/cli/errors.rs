//! CLI-specific error types
//!
//! A `CliError` means the process exits non-zero. Pipeline failures are
//! already reported in full by the run report and its logs; the CLI
//! error only carries the short diagnostic for stderr.

use std::fmt;
use std::io;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// The repair run ended in a failed terminal state
    RepairFailed,
    /// The integrity scan found the store corrupt or unreadable
    CheckFailed,
    /// The dump could not be taken
    DumpFailed,
    /// I/O error (stdout/stderr)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::RepairFailed => "MEND_CLI_REPAIR_FAILED",
            Self::CheckFailed => "MEND_CLI_CHECK_FAILED",
            Self::DumpFailed => "MEND_CLI_DUMP_FAILED",
            Self::IoError => "MEND_CLI_IO_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Repair run failed
    pub fn repair_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RepairFailed, msg)
    }

    /// Check found the store unhealthy
    pub fn check_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::CheckFailed, msg)
    }

    /// Dump failed
    pub fn dump_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::DumpFailed, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
