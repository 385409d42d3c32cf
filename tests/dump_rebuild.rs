//! Dump / Rebuild Tests
//!
//! The dump is best-effort: it captures every recoverable record and
//! honestly reports what it could not save. The rebuild replays the
//! script into a brand-new store that must itself scan clean.

mod common;

use common::{build_store, corrupt_record, truncate_last_record};
use dbmend::dump::{parse_statement, LogicalDumper, Statement};
use dbmend::integrity::{IntegrityChecker, Verdict};
use dbmend::rebuild::StoreRebuilder;
use dbmend::store::{Column, ColumnType, StoreHandle, TableDef, Value};
use tempfile::TempDir;

// =============================================================================
// Dump Then Rebuild
// =============================================================================

/// A clean store survives dump and rebuild with all rows intact.
#[test]
fn test_round_trip_preserves_all_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b"), (3, "c")]);

    let script = dir.path().join("dump.sql");
    let dump_report = LogicalDumper::dump(&db, &script).unwrap();
    assert!(!dump_report.is_partial());

    let target = dir.path().join("store.fixed");
    let rebuild_report = StoreRebuilder::rebuild(&script, &target).unwrap();
    assert_eq!(rebuild_report.tables_created, 1);
    assert_eq!(rebuild_report.rows_applied, 3);

    let original = StoreHandle::open(&db).unwrap();
    let rebuilt = StoreHandle::open(&target).unwrap();
    assert_eq!(original.rows("t").unwrap(), rebuilt.rows("t").unwrap());
}

/// Damaged rows are dropped; every surviving row makes it through.
#[test]
fn test_partial_round_trip_keeps_surviving_rows() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b"), (3, "c")]);
    corrupt_record(&db, 2);

    let script = dir.path().join("dump.sql");
    let dump_report = LogicalDumper::dump(&db, &script).unwrap();
    assert!(dump_report.is_partial());
    assert_eq!(dump_report.rows_captured, 2);
    assert_eq!(dump_report.records_skipped, 1);

    let target = dir.path().join("store.fixed");
    StoreRebuilder::rebuild(&script, &target).unwrap();

    let rebuilt = StoreHandle::open(&target).unwrap();
    assert_eq!(
        rebuilt.rows("t").unwrap(),
        &[
            vec![Value::Integer(1), Value::Text("a".into())],
            vec![Value::Integer(3), Value::Text("c".into())],
        ]
    );
}

/// A truncated store dumps everything before the lost tail.
#[test]
fn test_truncated_store_dumps_prefix() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "a"), (2, "b")]);
    truncate_last_record(&db);

    let script = dir.path().join("dump.sql");
    let report = LogicalDumper::dump(&db, &script).unwrap();
    assert!(report.lost_tail);
    assert_eq!(report.rows_captured, 1);
}

/// The rebuilt store always scans clean.
#[test]
fn test_rebuilt_store_scans_clean() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "it's"), (2, "b")]);
    corrupt_record(&db, 1);

    let script = dir.path().join("dump.sql");
    LogicalDumper::dump(&db, &script).unwrap();
    let target = dir.path().join("store.fixed");
    StoreRebuilder::rebuild(&script, &target).unwrap();

    assert_eq!(IntegrityChecker::check(&target).verdict, Verdict::Ok);
}

/// Text values with quotes survive the script round trip.
#[test]
fn test_quoted_text_survives_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    build_store(&db, &[(1, "o'brien"), (2, "a''b"), (3, "")]);

    let script = dir.path().join("dump.sql");
    LogicalDumper::dump(&db, &script).unwrap();
    let target = dir.path().join("store.fixed");
    StoreRebuilder::rebuild(&script, &target).unwrap();

    let rebuilt = StoreHandle::open(&target).unwrap();
    assert_eq!(
        rebuilt.rows("t").unwrap()[0],
        vec![Value::Integer(1), Value::Text("o'brien".into())]
    );
    assert_eq!(
        rebuilt.rows("t").unwrap()[1],
        vec![Value::Integer(2), Value::Text("a''b".into())]
    );
    assert_eq!(
        rebuilt.rows("t").unwrap()[2],
        vec![Value::Integer(3), Value::Text("".into())]
    );
}

/// Non-finite REAL values survive the script round trip; the rebuilder
/// replays every literal the dumper emits.
#[test]
fn test_nonfinite_reals_survive_round_trip() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.mend");
    {
        let mut handle = StoreHandle::create(&db).unwrap();
        handle
            .create_table(TableDef::new(
                "r",
                vec![Column::new("x", ColumnType::Real)],
            ))
            .unwrap();
        handle.insert("r", vec![Value::Real(f64::INFINITY)]).unwrap();
        handle
            .insert("r", vec![Value::Real(f64::NEG_INFINITY)])
            .unwrap();
        handle.insert("r", vec![Value::Real(f64::NAN)]).unwrap();
        handle.sync().unwrap();
    }

    let script = dir.path().join("dump.sql");
    let dump_report = LogicalDumper::dump(&db, &script).unwrap();
    assert_eq!(dump_report.rows_captured, 3);

    let target = dir.path().join("store.fixed");
    let rebuild_report = StoreRebuilder::rebuild(&script, &target).unwrap();
    assert_eq!(rebuild_report.rows_applied, 3);

    let rebuilt = StoreHandle::open(&target).unwrap();
    let rows = rebuilt.rows("r").unwrap();
    assert_eq!(rows[0], vec![Value::Real(f64::INFINITY)]);
    assert_eq!(rows[1], vec![Value::Real(f64::NEG_INFINITY)]);
    match rows[2][0] {
        Value::Real(x) => assert!(x.is_nan()),
        ref other => panic!("expected REAL, got {:?}", other),
    }
}

// =============================================================================
// Script Grammar
// =============================================================================

/// Every emitted statement parses back to itself.
#[test]
fn test_statement_display_parses_back() {
    let lines = [
        "CREATE TABLE t (id INTEGER, v TEXT);",
        "INSERT INTO t VALUES (1,'a');",
        "INSERT INTO t VALUES (NULL,'it''s');",
    ];
    for line in lines {
        let statement = parse_statement(line).unwrap().unwrap();
        assert_eq!(statement.to_string(), line);
    }
}

/// Comments and blank lines are ignored, not errors.
#[test]
fn test_comments_and_blanks_ignored() {
    assert!(parse_statement("").unwrap().is_none());
    assert!(parse_statement("   ").unwrap().is_none());
    assert!(parse_statement("-- header comment").unwrap().is_none());
}

/// Unknown statements are rejected with a reason.
#[test]
fn test_unknown_statement_rejected() {
    assert!(parse_statement("DROP TABLE t;").is_err());
    assert!(parse_statement("CREATE TABLE").is_err());
}

/// Real literals keep their type through the script.
#[test]
fn test_real_literal_keeps_type() {
    let statement = parse_statement("INSERT INTO t VALUES (2.0,-1.5);")
        .unwrap()
        .unwrap();
    match statement {
        Statement::Insert { values, .. } => {
            assert_eq!(values, vec![Value::Real(2.0), Value::Real(-1.5)]);
        }
        other => panic!("unexpected statement: {:?}", other),
    }
}
