//! Dump-specific error types
//!
//! Per REPAIR.md §4.3 the dumper is best-effort: damaged records are
//! skipped and counted, never surfaced as errors. Only two conditions
//! are fatal to the dump step itself:
//! - the source cannot be opened at all
//! - the script artifact cannot be written

use std::fmt;
use std::io;

/// Dump error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpErrorCode {
    /// Source store file cannot be opened
    MendDumpUnreadable,
    /// Script artifact cannot be written
    MendDumpIo,
}

impl DumpErrorCode {
    /// Returns the string representation per ERRORS.md format
    pub fn as_str(&self) -> &'static str {
        match self {
            DumpErrorCode::MendDumpUnreadable => "MEND_DUMP_UNREADABLE",
            DumpErrorCode::MendDumpIo => "MEND_DUMP_IO",
        }
    }
}

impl fmt::Display for DumpErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dump error with full context
#[derive(Debug)]
pub struct DumpError {
    code: DumpErrorCode,
    message: String,
    source: Option<io::Error>,
}

impl DumpError {
    /// Source store cannot be opened
    pub fn unreadable(message: impl Into<String>) -> Self {
        Self {
            code: DumpErrorCode::MendDumpUnreadable,
            message: message.into(),
            source: None,
        }
    }

    /// Script I/O failure
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: DumpErrorCode::MendDumpIo,
            message: message.into(),
            source: Some(source),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> DumpErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DumpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for DumpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for dump operations
pub type DumpResult<T> = Result<T, DumpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_spec() {
        assert_eq!(DumpErrorCode::MendDumpUnreadable.as_str(), "MEND_DUMP_UNREADABLE");
        assert_eq!(DumpErrorCode::MendDumpIo.as_str(), "MEND_DUMP_IO");
    }

    #[test]
    fn test_error_display() {
        let err = DumpError::unreadable("cannot open store");
        let display = format!("{}", err);
        assert!(display.contains("MEND_DUMP_UNREADABLE"));
        assert!(display.contains("cannot open store"));
    }
}
