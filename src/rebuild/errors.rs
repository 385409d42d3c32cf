//! Rebuild-specific error types
//!
//! A failed rebuild loses nothing: the active file and the backup are
//! untouched, and the partial target is removed. All rebuild errors are
//! therefore ordinary step failures, not fatal states.

use std::fmt;
use std::io;

/// Rebuild error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildErrorCode {
    /// A script statement could not be parsed or applied
    MendRebuildMalformedStatement,
    /// The target store file could not be created
    MendRebuildTarget,
    /// I/O failure while reading the script or writing the target
    MendRebuildIo,
}

impl RebuildErrorCode {
    /// Returns the string representation per ERRORS.md format
    pub fn as_str(&self) -> &'static str {
        match self {
            RebuildErrorCode::MendRebuildMalformedStatement => "MEND_REBUILD_MALFORMED_STATEMENT",
            RebuildErrorCode::MendRebuildTarget => "MEND_REBUILD_TARGET",
            RebuildErrorCode::MendRebuildIo => "MEND_REBUILD_IO",
        }
    }
}

impl fmt::Display for RebuildErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rebuild error with full context
#[derive(Debug)]
pub struct RebuildError {
    code: RebuildErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl RebuildError {
    /// Malformed or inapplicable statement, with its line number
    pub fn malformed(line_no: usize, reason: impl Into<String>) -> Self {
        Self {
            code: RebuildErrorCode::MendRebuildMalformedStatement,
            message: format!("line {}: {}", line_no, reason.into()),
            source: None,
        }
    }

    /// Target creation failure
    pub fn target(message: impl Into<String>) -> Self {
        Self {
            code: RebuildErrorCode::MendRebuildTarget,
            message: message.into(),
            source: None,
        }
    }

    /// I/O failure
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: RebuildErrorCode::MendRebuildIo,
            message: message.into(),
            source: Some(source),
        }
    }

    /// I/O failure without an underlying io::Error
    pub fn io_error_no_source(message: impl Into<String>) -> Self {
        Self {
            code: RebuildErrorCode::MendRebuildIo,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> RebuildErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RebuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for RebuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for rebuild operations
pub type RebuildResult<T> = Result<T, RebuildError>;
