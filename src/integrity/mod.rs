//! Integrity checking
//!
//! Per REPAIR.md §4.2, the checker runs a read-only consistency scan
//! over a store file and returns a verdict:
//!
//! - `Ok`: the scan reports no anomalies
//! - `Corrupt`: the file opens but the header or at least one record is
//!   structurally damaged
//! - `Unreadable`: the file cannot be opened at all
//!
//! The verdict is the sole gate of the repair pipeline. The checker has
//! no side effects and never mutates the file.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::store::{RecordScanner, ScanItem};

/// Consistency scan verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No anomalies found; repair is not needed
    Ok,
    /// File opens but contains structural anomalies
    Corrupt,
    /// File cannot be opened or scanned at all
    Unreadable,
}

impl Verdict {
    /// String form for logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Corrupt => "CORRUPT",
            Verdict::Unreadable => "UNREADABLE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of a consistency scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// The verdict
    pub verdict: Verdict,
    /// Records that validated cleanly
    pub records_scanned: u64,
    /// Records skipped over a checksum or decode failure
    pub records_skipped: u64,
    /// Whether an unrecoverable tail region was found
    pub lost_tail: bool,
    /// Human-readable anomaly descriptions
    pub diagnostics: Vec<String>,
}

impl ScanReport {
    fn healthy(records_scanned: u64) -> Self {
        Self {
            verdict: Verdict::Ok,
            records_scanned,
            records_skipped: 0,
            lost_tail: false,
            diagnostics: Vec::new(),
        }
    }

    fn unreadable(reason: String) -> Self {
        Self {
            verdict: Verdict::Unreadable,
            records_scanned: 0,
            records_skipped: 0,
            lost_tail: false,
            diagnostics: vec![reason],
        }
    }
}

/// Read-only consistency checker
pub struct IntegrityChecker;

impl IntegrityChecker {
    /// Scan a store file and classify it.
    ///
    /// Filesystem-level failures (missing file, permission denied, read
    /// errors mid-scan) produce `Unreadable`; structural anomalies in an
    /// openable file produce `Corrupt`; a clean scan produces `Ok`.
    pub fn check(path: &Path) -> ScanReport {
        let mut scanner = match RecordScanner::open(path) {
            Ok(s) => s,
            Err(e) => return ScanReport::unreadable(e.to_string()),
        };

        let mut records_scanned = 0u64;
        let mut records_skipped = 0u64;
        let mut lost_tail = false;
        let mut diagnostics = Vec::new();

        loop {
            match scanner.next_item() {
                Ok(Some(ScanItem::Record { .. })) => records_scanned += 1,
                Ok(Some(ScanItem::Skipped { offset, reason })) => {
                    records_skipped += 1;
                    diagnostics.push(format!("record at offset {}: {}", offset, reason));
                }
                Ok(Some(ScanItem::Tail { offset, reason })) => {
                    lost_tail = true;
                    diagnostics.push(format!("unrecoverable tail at offset {}: {}", offset, reason));
                }
                Ok(None) => break,
                Err(e) => return ScanReport::unreadable(e.to_string()),
            }
        }

        if records_skipped == 0 && !lost_tail {
            ScanReport::healthy(records_scanned)
        } else {
            ScanReport {
                verdict: Verdict::Corrupt,
                records_scanned,
                records_skipped,
                lost_tail,
                diagnostics,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Column, ColumnType, StoreHandle, TableDef, Value};
    use tempfile::TempDir;

    fn build_store(path: &Path) {
        let mut handle = StoreHandle::create(path).unwrap();
        handle
            .create_table(TableDef::new(
                "t",
                vec![
                    Column::new("id", ColumnType::Integer),
                    Column::new("v", ColumnType::Text),
                ],
            ))
            .unwrap();
        handle
            .insert("t", vec![Value::Integer(1), Value::Text("a".into())])
            .unwrap();
        handle.sync().unwrap();
    }

    #[test]
    fn test_healthy_store_is_ok() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.mend");
        build_store(&path);

        let report = IntegrityChecker::check(&path);
        assert_eq!(report.verdict, Verdict::Ok);
        assert_eq!(report.records_scanned, 2);
        assert_eq!(report.records_skipped, 0);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let report = IntegrityChecker::check(&dir.path().join("absent.mend"));
        assert_eq!(report.verdict, Verdict::Unreadable);
        assert!(!report.diagnostics.is_empty());
    }

    #[test]
    fn test_damaged_record_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.mend");
        build_store(&path);

        let mut bytes = std::fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        std::fs::write(&path, &bytes).unwrap();

        let report = IntegrityChecker::check(&path);
        assert_eq!(report.verdict, Verdict::Corrupt);
        assert_eq!(report.records_skipped, 1);
        assert!(!report.lost_tail);
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.mend");
        std::fs::write(&path, b"garbage").unwrap();

        let report = IntegrityChecker::check(&path);
        assert_eq!(report.verdict, Verdict::Corrupt);
        assert!(report.lost_tail);
    }

    #[test]
    fn test_check_does_not_mutate() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.mend");
        build_store(&path);

        let before = std::fs::read(&path).unwrap();
        let _ = IntegrityChecker::check(&path);
        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_verdict_strings() {
        assert_eq!(Verdict::Ok.as_str(), "OK");
        assert_eq!(Verdict::Corrupt.as_str(), "CORRUPT");
        assert_eq!(Verdict::Unreadable.as_str(), "UNREADABLE");
    }
}
