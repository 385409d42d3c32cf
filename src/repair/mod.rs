//! Repair pipeline orchestration
//!
//! Per REPAIR.md §4.6, a run is: backup, integrity check, and then
//! either an early healthy exit or dump / rebuild / verify / promote.
//! Stage ordering is fixed; the backup always happens before anything
//! else so every later step has a known-good fallback, and the active
//! path is only touched by the final atomic promotion.
//!
//! `repair` never panics and never returns `Err`: every failure mode
//! lands in a terminal report with the failed stage, the error, and
//! the paths of whatever artifacts were produced before the abort.

mod errors;
mod report;
mod state;

pub use errors::{RepairError, RepairResult};
pub use report::{RepairOutcome, RepairReport};
pub use state::{FailedStage, RepairState};

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::artifacts::{artifact_path, run_stamp, ArtifactKind};
use crate::backup::BackupManager;
use crate::dump::LogicalDumper;
use crate::integrity::{IntegrityChecker, Verdict};
use crate::observability::{events, Logger};
use crate::promote::AtomicPromoter;
use crate::rebuild::StoreRebuilder;

/// Artifacts and counters accumulated while a run is in flight, so a
/// failed run can still report everything that happened before the
/// abort.
#[derive(Default)]
struct RunArtifacts {
    verdict: Option<Verdict>,
    backup_path: Option<PathBuf>,
    dump_path: Option<PathBuf>,
    replaced_path: Option<PathBuf>,
    rows_captured: u64,
    rows_skipped: u64,
    lost_tail: bool,
}

/// Drives one repair run end to end.
pub struct RepairOrchestrator;

impl RepairOrchestrator {
    /// Run the full pipeline against the store at `db_path`.
    pub fn repair(db_path: &Path) -> RepairReport {
        let run_id = Uuid::new_v4();
        let rid = run_id.to_string();
        let stamp = run_stamp();
        let db = db_path.display().to_string();

        Logger::info(
            events::REPAIR_START,
            &[("db_path", &db), ("run_id", &rid), ("stamp", &stamp)],
        );

        let mut state = RepairState::new();
        let mut arts = RunArtifacts::default();

        match Self::run(db_path, &stamp, &rid, &mut state, &mut arts) {
            Ok(outcome) => RepairReport {
                run_id,
                stamp,
                db_path: db_path.to_path_buf(),
                outcome,
                failed_stage: None,
                verdict: arts.verdict,
                backup_path: arts.backup_path,
                dump_path: arts.dump_path,
                replaced_path: arts.replaced_path,
                rows_captured: arts.rows_captured,
                rows_skipped: arts.rows_skipped,
                lost_tail: arts.lost_tail,
                error: None,
            },
            Err(e) => {
                let stage = e.stage();
                if let Some(stage) = stage {
                    if let Ok(failed) = std::mem::take(&mut state).fail(stage) {
                        state = failed;
                    }
                }

                // On a swap failure without rollback the original now
                // lives at the replaced path; the operator needs it.
                if let RepairError::Promote(pe) = &e {
                    if !pe.rolled_back() {
                        arts.replaced_path = pe.replaced_path().cloned();
                    }
                }

                let error_text = e.to_string();
                let stage_name = stage.map(|s| s.as_str()).unwrap_or("UNKNOWN");
                let backup = arts
                    .backup_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                let fields: [(&str, &str); 5] = [
                    ("backup_path", &backup),
                    ("db_path", &db),
                    ("error", &error_text),
                    ("run_id", &rid),
                    ("stage", stage_name),
                ];
                if e.is_fatal() {
                    Logger::fatal(events::REPAIR_FAILED, &fields);
                } else {
                    Logger::error(events::REPAIR_FAILED, &fields);
                }

                let _ = state;
                RepairReport {
                    run_id,
                    stamp,
                    db_path: db_path.to_path_buf(),
                    outcome: RepairOutcome::Failed,
                    failed_stage: stage,
                    verdict: arts.verdict,
                    backup_path: arts.backup_path,
                    dump_path: arts.dump_path,
                    replaced_path: arts.replaced_path,
                    rows_captured: arts.rows_captured,
                    rows_skipped: arts.rows_skipped,
                    lost_tail: arts.lost_tail,
                    error: Some(error_text),
                }
            }
        }
    }

    fn run(
        db_path: &Path,
        stamp: &str,
        rid: &str,
        state: &mut RepairState,
        arts: &mut RunArtifacts,
    ) -> RepairResult<RepairOutcome> {
        let db = db_path.display().to_string();

        // Stage 1: backup. Nothing else runs without one.
        let backup_path = BackupManager::create_backup(db_path, stamp)?;
        let backup = backup_path.display().to_string();
        Logger::info(
            events::BACKUP_COMPLETE,
            &[("backup_path", &backup), ("run_id", rid)],
        );
        arts.backup_path = Some(backup_path);
        *state = std::mem::take(state).mark_backed_up()?;

        // Stage 2: integrity check, the sole gate of the pipeline
        let scan = IntegrityChecker::check(db_path);
        arts.verdict = Some(scan.verdict);
        let scanned = scan.records_scanned.to_string();
        let skipped = scan.records_skipped.to_string();
        Logger::info(
            events::INTEGRITY_VERDICT,
            &[
                ("lost_tail", if scan.lost_tail { "true" } else { "false" }),
                ("records_scanned", &scanned),
                ("records_skipped", &skipped),
                ("run_id", rid),
                ("verdict", scan.verdict.as_str()),
            ],
        );
        *state = std::mem::take(state).mark_checked(scan.verdict)?;

        if scan.verdict == Verdict::Ok {
            *state = std::mem::take(state).finish_healthy()?;
            Logger::info(
                events::REPAIR_HEALTHY,
                &[
                    ("backup_path", &backup),
                    ("db_path", &db),
                    ("run_id", rid),
                ],
            );
            return Ok(RepairOutcome::OkNoRepairNeeded);
        }

        // Stage 3: best-effort logical dump
        let dump_path = artifact_path(db_path, ArtifactKind::Dump, stamp);
        let dump_report = LogicalDumper::dump(db_path, &dump_path)?;
        arts.dump_path = Some(dump_path.clone());
        arts.rows_captured = dump_report.rows_captured;
        arts.rows_skipped = dump_report.records_skipped;
        arts.lost_tail = dump_report.lost_tail;

        let dump = dump_path.display().to_string();
        let rows = dump_report.rows_captured.to_string();
        let tables = dump_report.tables_captured.to_string();
        Logger::info(
            events::DUMP_COMPLETE,
            &[
                ("dump_path", &dump),
                ("rows_captured", &rows),
                ("run_id", rid),
                ("tables_captured", &tables),
            ],
        );
        if dump_report.is_partial() {
            let dropped = dump_report.records_skipped.to_string();
            Logger::warn(
                events::DUMP_PARTIAL,
                &[
                    (
                        "lost_tail",
                        if dump_report.lost_tail { "true" } else { "false" },
                    ),
                    ("records_skipped", &dropped),
                    ("run_id", rid),
                ],
            );
        }
        *state = std::mem::take(state).mark_dumped()?;

        // Stage 4: rebuild at a temporary path, never the active one
        let fixed_path = artifact_path(db_path, ArtifactKind::Fixed, stamp);
        let rebuild_report = StoreRebuilder::rebuild(&dump_path, &fixed_path)?;
        let fixed = fixed_path.display().to_string();
        let applied = rebuild_report.rows_applied.to_string();
        let created = rebuild_report.tables_created.to_string();
        Logger::info(
            events::REBUILD_COMPLETE,
            &[
                ("rows_applied", &applied),
                ("run_id", rid),
                ("store_path", &fixed),
                ("tables_created", &created),
            ],
        );

        // A rebuilt store that does not itself scan clean must never be
        // promoted over the original.
        let verify = IntegrityChecker::check(&fixed_path);
        if verify.verdict != Verdict::Ok {
            let _ = std::fs::remove_file(&fixed_path);
            return Err(RepairError::Verification(format!(
                "rebuilt store at {} scanned {}",
                fixed_path.display(),
                verify.verdict
            )));
        }
        Logger::info(
            events::REBUILD_VERIFIED,
            &[("run_id", rid), ("store_path", &fixed)],
        );
        *state = std::mem::take(state).mark_rebuilt()?;

        // Stage 5: atomic promotion
        let replaced_path = AtomicPromoter::promote(db_path, &fixed_path, stamp)?;
        let replaced = replaced_path.display().to_string();
        Logger::info(
            events::PROMOTE_COMPLETE,
            &[
                ("active_path", &db),
                ("replaced_path", &replaced),
                ("run_id", rid),
            ],
        );
        arts.replaced_path = Some(replaced_path);
        *state = std::mem::take(state).mark_promoted()?;
        *state = std::mem::take(state).complete()?;

        Logger::info(
            events::REPAIR_COMPLETE,
            &[
                ("backup_path", &backup),
                ("outcome", RepairOutcome::Repaired.as_str()),
                ("run_id", rid),
            ],
        );
        Ok(RepairOutcome::Repaired)
    }
}
