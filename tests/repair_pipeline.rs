//! Repair Pipeline Tests
//!
//! End-to-end properties of a full repair run:
//! - a healthy store is reported healthy and left byte-identical
//! - a corrupt store ends up healthy with all surviving rows
//! - a backup exists for every run that got past the backup stage,
//!   whatever the outcome
//! - all artifacts of one run share one stamp
//! - a second run over a repaired store is a no-op

mod common;

use common::{build_store, corrupt_record, truncate_last_record};
use dbmend::integrity::{IntegrityChecker, Verdict};
use dbmend::repair::{FailedStage, RepairOrchestrator, RepairOutcome};
use dbmend::store::{StoreHandle, Value};
use tempfile::TempDir;

// =============================================================================
// Healthy Path
// =============================================================================

/// A healthy store is reported healthy and not modified.
#[test]
fn test_healthy_store_untouched() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b")]);
    let before = std::fs::read(&db).unwrap();

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::OkNoRepairNeeded);
    assert_eq!(report.verdict, Some(Verdict::Ok));
    assert_eq!(std::fs::read(&db).unwrap(), before);
    assert!(report.dump_path.is_none());
    assert!(report.replaced_path.is_none());
}

/// Even a healthy run leaves a verified backup behind.
#[test]
fn test_healthy_run_still_takes_backup() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a")]);

    let report = RepairOrchestrator::repair(&db);

    let backup = report.backup_path.expect("backup must exist");
    assert_eq!(std::fs::read(&db).unwrap(), std::fs::read(backup).unwrap());
}

// =============================================================================
// Repair Path
// =============================================================================

/// A corrupt store ends up healthy with every surviving row, and every
/// artifact of the run is retained.
#[test]
fn test_corrupt_store_repaired_with_artifacts() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b"), (3, "c")]);
    corrupt_record(&db, 2);
    let corrupted = std::fs::read(&db).unwrap();

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::Repaired);
    assert_eq!(report.verdict, Some(Verdict::Corrupt));
    assert_eq!(report.rows_captured, 2);
    assert_eq!(report.rows_skipped, 1);

    // Active path is now healthy and holds the surviving rows
    assert_eq!(IntegrityChecker::check(&db).verdict, Verdict::Ok);
    let handle = StoreHandle::open(&db).unwrap();
    assert_eq!(
        handle.rows("t").unwrap(),
        &[
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Integer(3), Value::Text("c".into())],
        ]
    );

    // Backup and replaced artifact both preserve the corrupt bytes
    assert_eq!(
        std::fs::read(report.backup_path.unwrap()).unwrap(),
        corrupted
    );
    assert_eq!(
        std::fs::read(report.replaced_path.unwrap()).unwrap(),
        corrupted
    );

    // Dump script retained
    assert!(report.dump_path.unwrap().exists());
}

/// All artifacts of one run carry the same stamp.
#[test]
fn test_artifacts_share_run_stamp() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a")]);
    corrupt_record(&db, 1);

    let report = RepairOrchestrator::repair(&db);
    assert_eq!(report.outcome, RepairOutcome::Repaired);

    for path in [
        report.backup_path.as_ref().unwrap(),
        report.dump_path.as_ref().unwrap(),
        report.replaced_path.as_ref().unwrap(),
    ] {
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with(&report.stamp));
    }
}

/// Corruption that destroys no row (trailing garbage) still triggers a
/// repair, and every row survives it.
#[test]
fn test_row_preserving_corruption_keeps_all_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b")]);
    // Garbage after the last record: CORRUPT verdict, zero rows lost
    let mut bytes = std::fs::read(&db).unwrap();
    bytes.extend_from_slice(b"\x00\x00\x00\x00trailing garbage");
    std::fs::write(&db, &bytes).unwrap();
    assert_eq!(IntegrityChecker::check(&db).verdict, Verdict::Corrupt);

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::Repaired);
    assert_eq!(report.rows_captured, 2);
    assert_eq!(report.rows_skipped, 0);
    assert!(report.lost_tail);

    let handle = StoreHandle::open(&db).unwrap();
    assert_eq!(
        handle.rows("t").unwrap(),
        &[
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Integer(2), Value::Text("b".into())],
        ]
    );
}

/// A truncated store is repaired down to its recoverable prefix.
#[test]
fn test_truncated_store_repaired_to_prefix() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b")]);
    truncate_last_record(&db);

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::Repaired);
    assert!(report.lost_tail);
    assert_eq!(report.rows_captured, 1);

    let handle = StoreHandle::open(&db).unwrap();
    assert_eq!(handle.row_count("t").unwrap(), 1);
}

/// A repaired store passes a follow-up run without further changes.
#[test]
fn test_repair_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b")]);
    corrupt_record(&db, 1);

    let first = RepairOrchestrator::repair(&db);
    assert_eq!(first.outcome, RepairOutcome::Repaired);

    let after_first = std::fs::read(&db).unwrap();
    let second = RepairOrchestrator::repair(&db);
    assert_eq!(second.outcome, RepairOutcome::OkNoRepairNeeded);
    assert_eq!(std::fs::read(&db).unwrap(), after_first);
}

// =============================================================================
// Failure Modes
// =============================================================================

/// A missing store fails in the backup stage with nothing created.
#[test]
fn test_missing_store_fails_before_any_mutation() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("absent.mend");

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::Failed);
    assert_eq!(report.failed_stage, Some(FailedStage::Backup));
    assert!(report.backup_path.is_none());
    assert!(report.error.is_some());
    // Directory left empty: no stray artifacts
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

/// A failed run report carries the failed stage and the error text.
#[test]
fn test_failed_run_report_is_complete() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("absent.mend");

    let report = RepairOrchestrator::repair(&db);

    assert_eq!(report.outcome, RepairOutcome::Failed);
    let value: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();
    assert_eq!(value["outcome"], "FAILED");
    assert_eq!(value["failed_stage"], "BACKUP");
    assert!(value["error"].is_string());
}

/// The run report serializes to JSON with stable field names.
#[test]
fn test_report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a")]);

    let report = RepairOrchestrator::repair(&db);
    let value: serde_json::Value =
        serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();

    assert_eq!(value["outcome"], "OK_NO_REPAIR_NEEDED");
    assert_eq!(value["verdict"], "OK");
    assert!(value["run_id"].is_string());
    assert!(value["backup_path"].is_string());
}
