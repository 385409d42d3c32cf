//! Store error types following ERRORS.md
//!
//! Error codes:
//! - MEND_STORE_IO_ERROR (ERROR severity)
//! - MEND_STORE_WRITE_FAILED (ERROR severity)
//! - MEND_STORE_READ_FAILED (ERROR severity)
//! - MEND_STORE_SCHEMA_VIOLATION (ERROR severity)
//! - MEND_STORE_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, caller decides how to proceed
    Error,
    /// The store cannot be trusted as-is
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Disk I/O failure
    MendStoreIoError,
    /// Record write failed
    MendStoreWriteFailed,
    /// Record read failed
    MendStoreReadFailed,
    /// Statement violates the catalog (unknown table, arity mismatch, ...)
    MendStoreSchemaViolation,
    /// Checksum or structural failure
    MendStoreCorruption,
}

impl StoreErrorCode {
    /// Returns the string code as defined in ERRORS.md
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::MendStoreIoError => "MEND_STORE_IO_ERROR",
            StoreErrorCode::MendStoreWriteFailed => "MEND_STORE_WRITE_FAILED",
            StoreErrorCode::MendStoreReadFailed => "MEND_STORE_READ_FAILED",
            StoreErrorCode::MendStoreSchemaViolation => "MEND_STORE_SCHEMA_VIOLATION",
            StoreErrorCode::MendStoreCorruption => "MEND_STORE_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::MendStoreIoError => Severity::Error,
            StoreErrorCode::MendStoreWriteFailed => Severity::Error,
            StoreErrorCode::MendStoreReadFailed => Severity::Error,
            StoreErrorCode::MendStoreSchemaViolation => Severity::Error,
            StoreErrorCode::MendStoreCorruption => Severity::Fatal,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with full context
#[derive(Debug)]
pub struct StoreError {
    /// Error code
    code: StoreErrorCode,
    /// Human-readable message
    message: String,
    /// Optional details about the error context
    details: Option<String>,
    /// Underlying IO error if applicable
    source: Option<io::Error>,
}

impl StoreError {
    /// Create a new store I/O error
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::MendStoreIoError,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new write failed error
    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::MendStoreWriteFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a new read failed error
    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::MendStoreReadFailed,
            message: message.into(),
            details: None,
            source: Some(source),
        }
    }

    /// Create a schema violation error
    pub fn schema_violation(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::MendStoreSchemaViolation,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new corruption error (FATAL)
    pub fn corruption(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::MendStoreCorruption,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a corruption error with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::MendStoreCorruption,
            message: reason.into(),
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether this error marks the store as untrustworthy
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_spec() {
        assert_eq!(StoreErrorCode::MendStoreIoError.code(), "MEND_STORE_IO_ERROR");
        assert_eq!(StoreErrorCode::MendStoreWriteFailed.code(), "MEND_STORE_WRITE_FAILED");
        assert_eq!(StoreErrorCode::MendStoreReadFailed.code(), "MEND_STORE_READ_FAILED");
        assert_eq!(
            StoreErrorCode::MendStoreSchemaViolation.code(),
            "MEND_STORE_SCHEMA_VIOLATION"
        );
        assert_eq!(StoreErrorCode::MendStoreCorruption.code(), "MEND_STORE_CORRUPTION");
    }

    #[test]
    fn test_corruption_is_fatal() {
        let err = StoreError::corruption("checksum mismatch");
        assert!(err.is_fatal());
        assert_eq!(err.code().code(), "MEND_STORE_CORRUPTION");
    }

    #[test]
    fn test_write_failed_not_fatal() {
        let err = StoreError::write_failed(
            "disk full",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_display_contains_required_fields() {
        let err = StoreError::corruption_at_offset(1024, "checksum mismatch");
        let display = format!("{}", err);
        assert!(display.contains("MEND_STORE_CORRUPTION"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 1024"));
    }
}
