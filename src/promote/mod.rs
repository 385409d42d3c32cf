//! Atomic promotion of a rebuilt store
//!
//! Per REPAIR.md §4.5, the active path must never be observed missing
//! or half-written. The replacement follows:
//! 1. Rename active -> `<name>.replaced.<stamp>` (original kept, not
//!    deleted)
//! 2. Rename rebuilt -> active
//! 3. fsync the parent directory
//!
//! Both moves are same-filesystem renames, so each step is atomic. If
//! the second rename fails after the first succeeded, a rollback rename
//! is attempted so the active path is not left vacant, and the failure
//! is surfaced as FATAL: the replaced artifact and the backup are the
//! operator's recovery material.

mod errors;

pub use errors::{PromoteError, PromoteErrorCode, PromoteResult, Severity};

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::artifacts::{artifact_path, ArtifactKind};
use crate::crash_point::{maybe_crash, points};

/// Swaps a rebuilt store into the active path.
pub struct AtomicPromoter;

impl AtomicPromoter {
    /// Promote `rebuilt_path` to `active_path`.
    ///
    /// Returns the path the original file was moved to.
    pub fn promote(
        active_path: &Path,
        rebuilt_path: &Path,
        stamp: &str,
    ) -> PromoteResult<PathBuf> {
        let replaced_path = artifact_path(active_path, ArtifactKind::Replaced, stamp);

        maybe_crash(points::PROMOTE_BEFORE_ASIDE);

        // Step 1: move the current (corrupt) file aside
        fs::rename(active_path, &replaced_path).map_err(|e| {
            PromoteError::aside_failed(
                format!(
                    "Failed to move {} aside to {}",
                    active_path.display(),
                    replaced_path.display()
                ),
                e,
            )
        })?;

        maybe_crash(points::PROMOTE_BETWEEN_RENAMES);

        // Step 2: move the rebuilt store into the now-vacant active path
        if let Err(e) = fs::rename(rebuilt_path, active_path) {
            // The active path is vacant right now. Try to put the
            // original back so a reader never finds the path missing.
            let rolled_back = fs::rename(&replaced_path, active_path).is_ok();
            return Err(PromoteError::swap_failed(
                format!(
                    "Failed to move {} into {}",
                    rebuilt_path.display(),
                    active_path.display()
                ),
                e,
                replaced_path,
                rebuilt_path.to_path_buf(),
                rolled_back,
            ));
        }

        maybe_crash(points::PROMOTE_AFTER_SWAP);

        // Step 3: make both new names durable
        Self::fsync_parent_best_effort(active_path);

        Ok(replaced_path)
    }

    /// fsync the parent directory. Both renames already happened; a
    /// failure here must not be reported as a failed promotion, so this
    /// is best-effort.
    fn fsync_parent_best_effort(path: &Path) {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const STAMP: &str = "20260827T101530123Z";

    #[test]
    fn test_promote_swaps_content() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("store.mend");
        let rebuilt = dir.path().join("store.mend.fixed.x");
        std::fs::write(&active, b"corrupt bytes").unwrap();
        std::fs::write(&rebuilt, b"rebuilt bytes").unwrap();

        let replaced = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap();

        assert_eq!(std::fs::read(&active).unwrap(), b"rebuilt bytes");
        assert_eq!(std::fs::read(&replaced).unwrap(), b"corrupt bytes");
        assert!(!rebuilt.exists());
        assert_eq!(
            replaced.file_name().unwrap().to_string_lossy(),
            format!("store.mend.replaced.{}", STAMP)
        );
    }

    #[test]
    fn test_aside_failure_moves_nothing() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("absent.mend");
        let rebuilt = dir.path().join("store.mend.fixed.x");
        std::fs::write(&rebuilt, b"rebuilt bytes").unwrap();

        let err = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap_err();

        assert_eq!(err.code(), PromoteErrorCode::MendPromoteAsideFailed);
        assert!(!err.is_fatal());
        // Rebuilt store untouched
        assert!(rebuilt.exists());
    }

    #[test]
    fn test_swap_failure_is_fatal_and_rolls_back() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("store.mend");
        std::fs::write(&active, b"original bytes").unwrap();
        // Rebuilt store is missing: first rename succeeds, second fails
        let rebuilt = dir.path().join("store.mend.fixed.x");

        let err = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap_err();

        assert_eq!(err.code(), PromoteErrorCode::MendPromoteSwapFailed);
        assert!(err.is_fatal());
        assert!(err.rolled_back());
        // Active path never left vacant
        assert!(active.exists());
        assert_eq!(std::fs::read(&active).unwrap(), b"original bytes");
    }

    #[test]
    fn test_replaced_artifact_retained() {
        let dir = TempDir::new().unwrap();
        let active = dir.path().join("store.mend");
        let rebuilt = dir.path().join("store.mend.fixed.x");
        std::fs::write(&active, b"old").unwrap();
        std::fs::write(&rebuilt, b"new").unwrap();

        let replaced = AtomicPromoter::promote(&active, &rebuilt, STAMP).unwrap();
        // The replaced artifact is retained, never deleted
        assert!(replaced.exists());
    }
}
