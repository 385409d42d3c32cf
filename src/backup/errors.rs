//! Backup-specific error types
//!
//! Per ERRORS.md, backup errors follow the standard error model:
//! - Structured error codes in MEND_CATEGORY_NAME format
//! - No silent failures
//!
//! Backup failure always aborts the repair run before any mutation, so
//! no severity distinction is needed: every backup error stops the
//! pipeline at FAILED_BACKUP with the original file untouched.

use std::fmt;
use std::io;

/// Backup error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupErrorCode {
    /// Source store file cannot be read
    MendBackupSourceUnreadable,
    /// Backup destination cannot be written
    MendBackupWriteFailed,
    /// Written copy does not match the source bytes
    MendBackupVerifyFailed,
}

impl BackupErrorCode {
    /// Returns the string representation per ERRORS.md format
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupErrorCode::MendBackupSourceUnreadable => "MEND_BACKUP_SOURCE_UNREADABLE",
            BackupErrorCode::MendBackupWriteFailed => "MEND_BACKUP_WRITE_FAILED",
            BackupErrorCode::MendBackupVerifyFailed => "MEND_BACKUP_VERIFY_FAILED",
        }
    }
}

impl fmt::Display for BackupErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Backup error with full context
#[derive(Debug)]
pub struct BackupError {
    /// Error code following MEND_CATEGORY_NAME format
    code: BackupErrorCode,
    /// Human-readable error message
    message: String,
    /// Optional underlying IO error
    source: Option<io::Error>,
}

impl BackupError {
    fn new(code: BackupErrorCode, message: impl Into<String>, source: Option<io::Error>) -> Self {
        Self {
            code,
            message: message.into(),
            source,
        }
    }

    /// Source cannot be read
    pub fn source_unreadable(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(BackupErrorCode::MendBackupSourceUnreadable, message, Some(source))
    }

    /// Destination cannot be written
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::new(BackupErrorCode::MendBackupWriteFailed, message, Some(source))
    }

    /// Written copy does not match the source
    pub fn verify_failed(message: impl Into<String>) -> Self {
        Self::new(BackupErrorCode::MendBackupVerifyFailed, message, None)
    }

    /// Returns the error code
    pub fn code(&self) -> BackupErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for BackupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code, self.message)?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for BackupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for backup operations
pub type BackupResult<T> = Result<T, BackupError>;
