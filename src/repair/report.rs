//! Repair run report
//!
//! One report per run, whatever the outcome. The report always carries
//! the backup path when a backup was taken, so the operator has a
//! known-good fallback even for failed runs.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use super::state::FailedStage;
use crate::integrity::Verdict;

/// Terminal outcome of a repair run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepairOutcome {
    /// Store was healthy; nothing was changed
    OkNoRepairNeeded,
    /// Store was rebuilt and promoted
    Repaired,
    /// Run aborted; see `failed_stage` and `error`
    Failed,
}

impl RepairOutcome {
    /// String form for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairOutcome::OkNoRepairNeeded => "OK_NO_REPAIR_NEEDED",
            RepairOutcome::Repaired => "REPAIRED",
            RepairOutcome::Failed => "FAILED",
        }
    }
}

/// Full accounting of a repair run
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    /// Unique id of this run; present in every log line of the run
    pub run_id: Uuid,
    /// Artifact stamp shared by all files this run created
    pub stamp: String,
    /// The store the run operated on
    pub db_path: PathBuf,
    /// Terminal outcome
    pub outcome: RepairOutcome,
    /// Stage the run failed in, when `outcome` is `Failed`
    pub failed_stage: Option<FailedStage>,
    /// Integrity verdict, when the scan ran
    pub verdict: Option<Verdict>,
    /// Backup artifact, when the backup stage completed
    pub backup_path: Option<PathBuf>,
    /// Dump script artifact, when the dump stage completed
    pub dump_path: Option<PathBuf>,
    /// Where the corrupt original was moved, when promotion moved it
    pub replaced_path: Option<PathBuf>,
    /// Rows the dump captured
    pub rows_captured: u64,
    /// Records the dump could not recover
    pub rows_skipped: u64,
    /// Whether the dump found an unrecoverable tail region
    pub lost_tail: bool,
    /// Error description, when `outcome` is `Failed`
    pub error: Option<String>,
}

impl RepairReport {
    /// Whether the run ended in a success state.
    pub fn is_success(&self) -> bool {
        self.outcome != RepairOutcome::Failed
    }

    /// Whether the dump left recoverable data behind.
    pub fn is_partial(&self) -> bool {
        self.rows_skipped > 0 || self.lost_tail
    }
}
