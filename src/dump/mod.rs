//! Best-effort logical dump
//!
//! Per REPAIR.md §4.3:
//! - Iterate every recoverable record in the (possibly corrupt) store
//! - Emit each as a replayable statement, schema before data
//! - Skip damaged records instead of aborting; report what was skipped
//! - Fail hard only if the source cannot be opened or the script cannot
//!   be written
//!
//! Corruption repair is best-effort recovery, not guaranteed full
//! recovery: the skip counts in the report are the honest accounting of
//! what could not be saved.

mod errors;
pub mod script;

pub use errors::{DumpError, DumpErrorCode, DumpResult};
pub use script::{parse_statement, Statement};

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::crash_point::{maybe_crash, points};
use crate::store::{RecordScanner, ScanItem, StoreRecord, TableDef, Value};

/// Outcome of a logical dump
#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    /// Path of the script artifact
    pub script_path: PathBuf,
    /// Tables whose definitions were recovered
    pub tables_captured: u64,
    /// Total rows captured across all tables
    pub rows_captured: u64,
    /// Captured row count per table
    pub rows_by_table: BTreeMap<String, u64>,
    /// Records skipped over checksum or decode failures, plus rows whose
    /// table definition was itself lost
    pub records_skipped: u64,
    /// Whether an unrecoverable tail region was found
    pub lost_tail: bool,
}

impl DumpReport {
    /// Whether anything recoverable was left behind.
    pub fn is_partial(&self) -> bool {
        self.records_skipped > 0 || self.lost_tail
    }
}

/// Best-effort logical dumper.
pub struct LogicalDumper;

impl LogicalDumper {
    /// Dump all recoverable content of `db_path` into a script at
    /// `script_path`.
    ///
    /// The script is written with `create_new` (artifacts are immutable
    /// once written) and fsynced. Rows whose table definition could not
    /// be recovered are unreplayable and counted as skipped. If the
    /// write fails partway, the partial script is removed best-effort.
    pub fn dump(db_path: &Path, script_path: &Path) -> DumpResult<DumpReport> {
        let mut scanner = RecordScanner::open(db_path)
            .map_err(|e| DumpError::unreadable(e.to_string()))?;

        let mut tables: Vec<TableDef> = Vec::new();
        let mut row_records: Vec<(String, Vec<Value>)> = Vec::new();
        let mut records_skipped = 0u64;
        let mut lost_tail = false;

        loop {
            let item = scanner
                .next_item()
                .map_err(|e| DumpError::unreadable(e.to_string()))?;
            match item {
                Some(ScanItem::Record { record, .. }) => match record {
                    StoreRecord::Table(def) => tables.push(def),
                    StoreRecord::Row { table, values } => row_records.push((table, values)),
                },
                Some(ScanItem::Skipped { .. }) => records_skipped += 1,
                Some(ScanItem::Tail { .. }) => lost_tail = true,
                None => break,
            }
        }

        let mut rows_by_table: BTreeMap<String, u64> = tables
            .iter()
            .map(|t| (t.name.clone(), 0u64))
            .collect();
        let mut rows_captured = 0u64;

        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(script_path)
            .map_err(|e| {
                DumpError::io_error(
                    format!("Failed to create dump script: {}", script_path.display()),
                    e,
                )
            })?;

        match Self::write_script(
            &mut file,
            db_path,
            script_path,
            &tables,
            row_records,
            &mut rows_by_table,
            &mut rows_captured,
            &mut records_skipped,
        ) {
            Ok(()) => {}
            Err(e) => {
                // A half-written script can never be replayed; remove it
                // so a failed run leaves no unreported artifact behind
                drop(file);
                Self::cleanup_partial_script(script_path);
                return Err(e);
            }
        }

        maybe_crash(points::DUMP_AFTER_SCRIPT);

        Ok(DumpReport {
            script_path: script_path.to_path_buf(),
            tables_captured: tables.len() as u64,
            rows_captured,
            rows_by_table,
            records_skipped,
            lost_tail,
        })
    }

    fn write_script(
        file: &mut std::fs::File,
        db_path: &Path,
        script_path: &Path,
        tables: &[TableDef],
        row_records: Vec<(String, Vec<Value>)>,
        rows_by_table: &mut BTreeMap<String, u64>,
        rows_captured: &mut u64,
        records_skipped: &mut u64,
    ) -> DumpResult<()> {
        let known: BTreeMap<&str, ()> =
            tables.iter().map(|t| (t.name.as_str(), ())).collect();

        let write_line = |file: &mut std::fs::File, line: &str| -> DumpResult<()> {
            file.write_all(line.as_bytes())
                .and_then(|_| file.write_all(b"\n"))
                .map_err(|e| {
                    DumpError::io_error(
                        format!("Failed to write dump script: {}", script_path.display()),
                        e,
                    )
                })
        };

        write_line(
            file,
            &format!("-- dbmend logical dump of {}", db_path.display()),
        )?;

        // Schema first, then data, each in file order
        for def in tables {
            write_line(file, &Statement::CreateTable(def.clone()).to_string())?;
        }
        for (table, values) in row_records {
            if !known.contains_key(table.as_str()) {
                // Row is readable but unreplayable: its table definition
                // was lost
                *records_skipped += 1;
                continue;
            }
            write_line(
                file,
                &Statement::Insert {
                    table: table.clone(),
                    values,
                }
                .to_string(),
            )?;
            *rows_by_table.entry(table).or_insert(0) += 1;
            *rows_captured += 1;
        }

        file.sync_all().map_err(|e| {
            DumpError::io_error(
                format!("Failed to fsync dump script: {}", script_path.display()),
                e,
            )
        })
    }

    /// Best-effort removal of a partial script. The dump error stands
    /// regardless.
    fn cleanup_partial_script(script_path: &Path) {
        let _ = std::fs::remove_file(script_path);
    }
}
