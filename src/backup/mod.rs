//! Pre-repair backup
//!
//! Per REPAIR.md §4.1:
//! - The backup is a byte-identical copy of the store file, taken before
//!   any other step touches it
//! - The destination is timestamp-named and never overwrites an earlier
//!   backup
//! - The source is never mutated
//! - The written copy is verified (CRC32 of destination vs source)
//!
//! Backup failure aborts the repair run before any mutation, so the
//! original file is still the single source of truth.

mod errors;

pub use errors::{BackupError, BackupErrorCode, BackupResult};

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::artifacts::{artifact_path, ArtifactKind};
use crate::crash_point::{maybe_crash, points};
use crate::store::compute_checksum;

const COPY_BUF_SIZE: usize = 64 * 1024;

/// Backup manager producing timestamped byte-identical copies.
pub struct BackupManager;

impl BackupManager {
    /// Copy the store file to `<name>.bak.<stamp>` next to it.
    ///
    /// The destination is created with `create_new`, so a repeated stamp
    /// can never overwrite a prior backup. The copy is streamed, fsynced,
    /// re-read, and CRC32-compared against the source bytes; the parent
    /// directory is fsynced so the new name is durable.
    ///
    /// Returns the backup path.
    pub fn create_backup(db_path: &Path, stamp: &str) -> BackupResult<PathBuf> {
        let backup_path = artifact_path(db_path, ArtifactKind::Backup, stamp);

        maybe_crash(points::BACKUP_BEFORE_COPY);

        let mut source = File::open(db_path).map_err(|e| {
            BackupError::source_unreadable(
                format!("Failed to open store file: {}", db_path.display()),
                e,
            )
        })?;

        let mut dest = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&backup_path)
            .map_err(|e| {
                BackupError::write_failed(
                    format!("Failed to create backup file: {}", backup_path.display()),
                    e,
                )
            })?;

        // Stream the copy, checksumming the source bytes as they pass
        let mut source_hasher = crc32fast::Hasher::new();
        let mut buf = vec![0u8; COPY_BUF_SIZE];
        loop {
            let n = source.read(&mut buf).map_err(|e| {
                BackupError::source_unreadable(
                    format!("Failed to read store file: {}", db_path.display()),
                    e,
                )
            })?;
            if n == 0 {
                break;
            }
            source_hasher.update(&buf[..n]);
            dest.write_all(&buf[..n]).map_err(|e| {
                BackupError::write_failed(
                    format!("Failed to write backup file: {}", backup_path.display()),
                    e,
                )
            })?;
        }
        let source_checksum = source_hasher.finalize();

        dest.sync_all().map_err(|e| {
            BackupError::write_failed(
                format!("Failed to fsync backup file: {}", backup_path.display()),
                e,
            )
        })?;
        drop(dest);

        // Verify: re-read what landed on disk
        let written = std::fs::read(&backup_path).map_err(|e| {
            BackupError::write_failed(
                format!("Failed to re-read backup file: {}", backup_path.display()),
                e,
            )
        })?;
        let written_checksum = compute_checksum(&written);
        if written_checksum != source_checksum {
            return Err(BackupError::verify_failed(format!(
                "Backup checksum mismatch: source crc32:{:08x}, copy crc32:{:08x}",
                source_checksum, written_checksum
            )));
        }

        fsync_parent(&backup_path)?;

        maybe_crash(points::BACKUP_AFTER_COPY);

        Ok(backup_path)
    }
}

/// fsync the parent directory of a path, making a new name durable.
pub(crate) fn fsync_parent(path: &Path) -> BackupResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = File::open(parent).map_err(|e| {
        BackupError::write_failed(format!("Failed to open directory: {}", parent.display()), e)
    })?;
    dir.sync_all().map_err(|e| {
        BackupError::write_failed(format!("Failed to fsync directory: {}", parent.display()), e)
    })
}
