//! Repair run state machine
//!
//! Per REPAIR.md §4.6:
//!
//! ```text
//! Start -> BackedUp -> Checked -> DoneHealthy
//!                            \-> Dumped -> Rebuilt -> Promoted -> Succeeded
//! ```
//!
//! plus a terminal `Failed(stage)` reachable from the state where that
//! stage runs. States are explicit and enumerable, transitions are
//! event-driven and deterministic, and every failure mode has a defined
//! terminal state instead of an uncaught error path.

use serde::Serialize;

use super::errors::{RepairError, RepairResult};
use crate::integrity::Verdict;

/// The pipeline stage a run failed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailedStage {
    /// Backup could not be taken; nothing was mutated
    Backup,
    /// Source was wholly unreadable or the script could not be written
    Dump,
    /// Dump script malformed, target creation failed, or the rebuilt
    /// store did not verify
    Rebuild,
    /// Promotion failed; if the swap rename failed this is the one
    /// state requiring manual operator recovery
    Promote,
}

impl FailedStage {
    /// Terminal-state name for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailedStage::Backup => "FAILED_BACKUP",
            FailedStage::Dump => "FAILED_DUMP",
            FailedStage::Rebuild => "FAILED_REBUILD",
            FailedStage::Promote => "FAILED_PROMOTE",
        }
    }
}

/// Repair run state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairState {
    /// Run created, nothing has happened yet
    Start,
    /// Backup artifact exists and is verified
    BackedUp,
    /// Integrity verdict is in
    Checked {
        /// The verdict gating the rest of the run
        verdict: Verdict,
    },
    /// Dump script artifact exists
    Dumped,
    /// Rebuilt store exists and verified clean
    Rebuilt,
    /// Rebuilt store now occupies the active path
    Promoted,
    /// Terminal: store was healthy, no repair performed
    DoneHealthy,
    /// Terminal: repair performed and promoted
    Succeeded,
    /// Terminal: run aborted in the named stage
    Failed {
        /// Stage the run failed in
        stage: FailedStage,
    },
}

impl Default for RepairState {
    fn default() -> Self {
        Self::new()
    }
}

impl RepairState {
    /// Create a new state machine in Start state.
    pub fn new() -> Self {
        Self::Start
    }

    /// Get the state name for observability.
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Start => "START",
            Self::BackedUp => "BACKED_UP",
            Self::Checked { .. } => "CHECKED",
            Self::Dumped => "DUMPED",
            Self::Rebuilt => "REBUILT",
            Self::Promoted => "PROMOTED",
            Self::DoneHealthy => "DONE_HEALTHY",
            Self::Succeeded => "SUCCESS",
            Self::Failed { stage } => stage.as_str(),
        }
    }

    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::DoneHealthy | Self::Succeeded | Self::Failed { .. }
        )
    }

    /// Backup completed.
    pub fn mark_backed_up(self) -> RepairResult<Self> {
        match self {
            Self::Start => Ok(Self::BackedUp),
            other => Err(invalid(other, "mark_backed_up")),
        }
    }

    /// Integrity scan completed.
    pub fn mark_checked(self, verdict: Verdict) -> RepairResult<Self> {
        match self {
            Self::BackedUp => Ok(Self::Checked { verdict }),
            other => Err(invalid(other, "mark_checked")),
        }
    }

    /// Store was healthy; terminate successfully with no further action.
    pub fn finish_healthy(self) -> RepairResult<Self> {
        match self {
            Self::Checked { verdict: Verdict::Ok } => Ok(Self::DoneHealthy),
            other => Err(invalid(other, "finish_healthy")),
        }
    }

    /// Dump completed. Only legal when the verdict was not `Ok`.
    pub fn mark_dumped(self) -> RepairResult<Self> {
        match self {
            Self::Checked { verdict } if verdict != Verdict::Ok => Ok(Self::Dumped),
            other => Err(invalid(other, "mark_dumped")),
        }
    }

    /// Rebuild completed and verified.
    pub fn mark_rebuilt(self) -> RepairResult<Self> {
        match self {
            Self::Dumped => Ok(Self::Rebuilt),
            other => Err(invalid(other, "mark_rebuilt")),
        }
    }

    /// Promotion completed.
    pub fn mark_promoted(self) -> RepairResult<Self> {
        match self {
            Self::Rebuilt => Ok(Self::Promoted),
            other => Err(invalid(other, "mark_promoted")),
        }
    }

    /// Run finished.
    pub fn complete(self) -> RepairResult<Self> {
        match self {
            Self::Promoted => Ok(Self::Succeeded),
            other => Err(invalid(other, "complete")),
        }
    }

    /// Run aborted in the given stage. Only legal from the state where
    /// that stage runs.
    pub fn fail(self, stage: FailedStage) -> RepairResult<Self> {
        let legal = matches!(
            (&self, stage),
            (Self::Start, FailedStage::Backup)
                | (Self::Checked { .. }, FailedStage::Dump)
                | (Self::Dumped, FailedStage::Rebuild)
                | (Self::Rebuilt, FailedStage::Promote)
        );
        if legal {
            Ok(Self::Failed { stage })
        } else {
            Err(invalid(self, "fail"))
        }
    }
}

fn invalid(from: RepairState, event: &'static str) -> RepairError {
    RepairError::InvalidTransition {
        from: from.state_name(),
        event,
    }
}
