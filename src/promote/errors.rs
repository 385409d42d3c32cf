//! Promotion-specific error types
//!
//! Two failure modes, deliberately asymmetric:
//! - `MEND_PROMOTE_ASIDE_FAILED` (ERROR): the first rename failed, so
//!   nothing moved; the active file is exactly where it was
//! - `MEND_PROMOTE_SWAP_FAILED` (FATAL): the second rename failed after
//!   the first succeeded; this is the one state that cannot be fully
//!   self-healed and requires manual operator recovery using the
//!   replaced artifact and the backup

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Severity of a promotion error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing moved; the run aborts cleanly
    Error,
    /// Manual operator recovery required
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

/// Promotion error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoteErrorCode {
    /// First rename (active -> replaced) failed; nothing moved
    MendPromoteAsideFailed,
    /// Second rename (rebuilt -> active) failed after the first succeeded
    MendPromoteSwapFailed,
}

impl PromoteErrorCode {
    /// Returns the string representation per ERRORS.md format
    pub fn as_str(&self) -> &'static str {
        match self {
            PromoteErrorCode::MendPromoteAsideFailed => "MEND_PROMOTE_ASIDE_FAILED",
            PromoteErrorCode::MendPromoteSwapFailed => "MEND_PROMOTE_SWAP_FAILED",
        }
    }

    /// Returns the severity level for this error code
    pub fn severity(&self) -> Severity {
        match self {
            PromoteErrorCode::MendPromoteAsideFailed => Severity::Error,
            PromoteErrorCode::MendPromoteSwapFailed => Severity::Fatal,
        }
    }
}

impl fmt::Display for PromoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Promotion error with recovery context
#[derive(Debug)]
pub struct PromoteError {
    code: PromoteErrorCode,
    message: String,
    source: Option<io::Error>,
    /// Where the original file now lives, if the first rename succeeded
    replaced_path: Option<PathBuf>,
    /// Where the rebuilt store still lives, if the swap failed
    rebuilt_path: Option<PathBuf>,
    /// Whether the rollback rename restored the active path
    rolled_back: bool,
}

impl PromoteError {
    /// First rename failed; nothing moved
    pub fn aside_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: PromoteErrorCode::MendPromoteAsideFailed,
            message: message.into(),
            source: Some(source),
            replaced_path: None,
            rebuilt_path: None,
            rolled_back: false,
        }
    }

    /// Second rename failed after the first succeeded
    pub fn swap_failed(
        message: impl Into<String>,
        source: io::Error,
        replaced_path: PathBuf,
        rebuilt_path: PathBuf,
        rolled_back: bool,
    ) -> Self {
        Self {
            code: PromoteErrorCode::MendPromoteSwapFailed,
            message: message.into(),
            source: Some(source),
            replaced_path: Some(replaced_path),
            rebuilt_path: Some(rebuilt_path),
            rolled_back,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> PromoteErrorCode {
        self.code
    }

    /// Returns the severity
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Whether manual operator recovery is required
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the original file was moved, if the first rename succeeded
    pub fn replaced_path(&self) -> Option<&PathBuf> {
        self.replaced_path.as_ref()
    }

    /// Where the rebuilt store still lives, if the swap failed
    pub fn rebuilt_path(&self) -> Option<&PathBuf> {
        self.rebuilt_path.as_ref()
    }

    /// Whether the rollback rename restored the active path
    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }
}

impl fmt::Display for PromoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code,
            self.message
        )?;
        if let Some(ref replaced) = self.replaced_path {
            write!(f, " (original at: {}", replaced.display())?;
            if let Some(ref rebuilt) = self.rebuilt_path {
                write!(f, ", rebuilt store at: {}", rebuilt.display())?;
            }
            write!(
                f,
                ", active path {})",
                if self.rolled_back {
                    "restored to original"
                } else {
                    "NOT restored"
                }
            )?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for PromoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for promotion operations
pub type PromoteResult<T> = Result<T, PromoteError>;
