//! Repair orchestration errors
//!
//! The orchestrator wraps the stage errors rather than re-describing
//! them; each stage error already carries its `MEND_*` code, severity,
//! and recovery context. The orchestrator only adds which terminal
//! state the run lands in.

use thiserror::Error;

use super::state::FailedStage;
use crate::backup::BackupError;
use crate::dump::DumpError;
use crate::promote::PromoteError;
use crate::rebuild::RebuildError;

/// An error that aborts a repair run
#[derive(Debug, Error)]
pub enum RepairError {
    /// Backup stage failed; nothing was mutated
    #[error(transparent)]
    Backup(#[from] BackupError),

    /// Dump stage failed
    #[error(transparent)]
    Dump(#[from] DumpError),

    /// Rebuild stage failed
    #[error(transparent)]
    Rebuild(#[from] RebuildError),

    /// Promotion failed
    #[error(transparent)]
    Promote(#[from] PromoteError),

    /// The rebuilt store did not pass the post-rebuild scan
    #[error("Rebuilt store failed verification: {0}")]
    Verification(String),

    /// State machine rejected an event
    #[error("Invalid repair state transition: {from} does not accept {event}")]
    InvalidTransition {
        /// State the machine was in
        from: &'static str,
        /// Event that was rejected
        event: &'static str,
    },
}

impl RepairError {
    /// The terminal stage this error maps to, if any.
    pub fn stage(&self) -> Option<FailedStage> {
        match self {
            RepairError::Backup(_) => Some(FailedStage::Backup),
            RepairError::Dump(_) => Some(FailedStage::Dump),
            RepairError::Rebuild(_) | RepairError::Verification(_) => {
                Some(FailedStage::Rebuild)
            }
            RepairError::Promote(_) => Some(FailedStage::Promote),
            RepairError::InvalidTransition { .. } => None,
        }
    }

    /// Whether manual operator recovery is required.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RepairError::Promote(e) if e.is_fatal())
    }
}

/// Result type for repair operations
pub type RepairResult<T> = Result<T, RepairError>;
