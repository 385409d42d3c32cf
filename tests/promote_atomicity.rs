//! Promotion Atomicity Tests
//!
//! The active path must always resolve to a complete store file:
//! - both moves are same-filesystem renames
//! - the corrupt original is moved aside, never deleted
//! - a failed swap attempts rollback and is FATAL

mod common;

use common::build_store;
use dbmend::integrity::{IntegrityChecker, Verdict};
use dbmend::promote::{AtomicPromoter, PromoteErrorCode};
use dbmend::store::{StoreHandle, Value};
use tempfile::TempDir;

const STAMP: &str = "20260827T101530123Z";

// =============================================================================
// Successful Promotion
// =============================================================================

/// After promotion the active path holds the rebuilt store and the
/// original is retained at the replaced path.
#[test]
fn test_promote_swaps_and_retains_original() {
    let dir = TempDir::new().unwrap();
    let active = dir.path().join("store.mend");
    let rebuilt = dir.path().join("store.mend.fixed.x");
    build_store(&rebuilt, &[(1, "a")]);
    std::fs::write(&active, b"corrupt original").unwrap();

    let replaced = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap();

    // Active path now opens as a healthy store
    assert_eq!(IntegrityChecker::check(&active).verdict, Verdict::Ok);
    let handle = StoreHandle::open(&active).unwrap();
    assert_eq!(
        handle.rows("t").unwrap()[0],
        vec![Value::Integer(1), Value::Text("a".into())]
    );

    // Original retained byte for byte
    assert_eq!(std::fs::read(&replaced).unwrap(), b"corrupt original");
    assert!(!rebuilt.exists());
}

/// The replaced artifact lands next to the active file with the
/// `.replaced.<stamp>` suffix.
#[test]
fn test_replaced_artifact_naming() {
    let dir = TempDir::new().unwrap();
    let active = dir.path().join("store.mend");
    let rebuilt = dir.path().join("store.mend.fixed.x");
    std::fs::write(&active, b"old").unwrap();
    std::fs::write(&rebuilt, b"new").unwrap();

    let replaced = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap();
    assert_eq!(replaced.parent(), active.parent());
    assert_eq!(
        replaced.file_name().unwrap().to_string_lossy(),
        format!("store.mend.replaced.{}", STAMP)
    );
}

// =============================================================================
// Failure Modes
// =============================================================================

/// If the first rename fails nothing has moved and the error is not
/// fatal.
#[test]
fn test_aside_failure_leaves_everything_in_place() {
    let dir = TempDir::new().unwrap();
    let active = dir.path().join("absent.mend");
    let rebuilt = dir.path().join("store.mend.fixed.x");
    std::fs::write(&rebuilt, b"rebuilt").unwrap();

    let err = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap_err();

    assert_eq!(err.code(), PromoteErrorCode::MendPromoteAsideFailed);
    assert!(!err.is_fatal());
    assert!(rebuilt.exists());
}

/// A failed swap is FATAL, rolls the original back, and never leaves
/// the active path vacant.
#[test]
fn test_swap_failure_restores_active_path() {
    let dir = TempDir::new().unwrap();
    let active = dir.path().join("store.mend");
    std::fs::write(&active, b"original").unwrap();
    // The rebuilt path does not exist: rename one succeeds, rename two
    // fails, exercising the window between the renames
    let rebuilt = dir.path().join("store.mend.fixed.x");

    let err = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap_err();

    assert_eq!(err.code(), PromoteErrorCode::MendPromoteSwapFailed);
    assert!(err.is_fatal());
    assert!(err.rolled_back());
    assert!(active.exists());
    assert_eq!(std::fs::read(&active).unwrap(), b"original");
}

/// The swap-failure error carries the paths an operator needs.
#[test]
fn test_swap_failure_reports_recovery_paths() {
    let dir = TempDir::new().unwrap();
    let active = dir.path().join("store.mend");
    std::fs::write(&active, b"original").unwrap();
    let rebuilt = dir.path().join("store.mend.fixed.x");

    let err = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap_err();

    assert!(err.replaced_path().is_some());
    assert_eq!(err.rebuilt_path(), Some(&rebuilt.to_path_buf()));
    let display = format!("{}", err);
    assert!(display.contains("MEND_PROMOTE_SWAP_FAILED"));
    assert!(display.contains("FATAL"));
}
