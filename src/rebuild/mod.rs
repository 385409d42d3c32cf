//! Store rebuild from a dump script
//!
//! Per REPAIR.md §4.4:
//! - Execute the script's statements against a brand-new, empty store
//!   at a temporary path
//! - Never touch the active path
//! - On any failure, remove the partial target; the original file and
//!   the backup remain the only valid copies, so a failed rebuild loses
//!   nothing

mod errors;

pub use errors::{RebuildError, RebuildErrorCode, RebuildResult};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::crash_point::{maybe_crash, points};
use crate::dump::{parse_statement, Statement};
use crate::store::StoreHandle;

/// Outcome of a rebuild
#[derive(Debug, Clone, Serialize)]
pub struct RebuildReport {
    /// Path of the rebuilt store
    pub store_path: PathBuf,
    /// Tables created
    pub tables_created: u64,
    /// Rows applied
    pub rows_applied: u64,
}

/// Replays a dump script into a fresh store file.
pub struct StoreRebuilder;

impl StoreRebuilder {
    /// Rebuild a store at `target_path` from the script at `script_path`.
    ///
    /// The target is created with `create_new`; a pre-existing file at
    /// the target path is an error, never clobbered.
    pub fn rebuild(script_path: &Path, target_path: &Path) -> RebuildResult<RebuildReport> {
        let script = std::fs::read_to_string(script_path).map_err(|e| {
            RebuildError::io_error(
                format!("Failed to read dump script: {}", script_path.display()),
                e,
            )
        })?;

        let mut handle = StoreHandle::create(target_path)
            .map_err(|e| RebuildError::target(e.to_string()))?;

        match Self::apply_script(&mut handle, &script) {
            Ok((tables_created, rows_applied)) => {
                handle.sync().map_err(|e| {
                    // Unsyncable target is as useless as an unwritable one
                    Self::cleanup_partial_target(target_path);
                    RebuildError::io_error_no_source(e.to_string())
                })?;

                maybe_crash(points::REBUILD_AFTER_SYNC);

                Ok(RebuildReport {
                    store_path: target_path.to_path_buf(),
                    tables_created,
                    rows_applied,
                })
            }
            Err(e) => {
                drop(handle);
                Self::cleanup_partial_target(target_path);
                Err(e)
            }
        }
    }

    fn apply_script(handle: &mut StoreHandle, script: &str) -> RebuildResult<(u64, u64)> {
        let mut tables_created = 0u64;
        let mut rows_applied = 0u64;

        for (idx, line) in script.lines().enumerate() {
            let line_no = idx + 1;
            let statement = parse_statement(line)
                .map_err(|reason| RebuildError::malformed(line_no, reason))?;

            match statement {
                None => {}
                Some(Statement::CreateTable(def)) => {
                    handle
                        .create_table(def)
                        .map_err(|e| RebuildError::malformed(line_no, e.to_string()))?;
                    tables_created += 1;
                }
                Some(Statement::Insert { table, values }) => {
                    handle
                        .insert(&table, values)
                        .map_err(|e| RebuildError::malformed(line_no, e.to_string()))?;
                    rows_applied += 1;
                }
            }
        }

        Ok((tables_created, rows_applied))
    }

    /// Best-effort removal of a partial target. Failure to clean up is
    /// not an error in its own right; the rebuild error stands.
    fn cleanup_partial_target(target_path: &Path) {
        let _ = std::fs::remove_file(target_path);
    }
}
