//! Repair artifact naming
//!
//! Per REPAIR.md §6, every artifact a repair run produces is colocated
//! with the active store file and named `<name>.<suffix>.<stamp>`:
//!
//! - `<name>.bak.<stamp>`       - pre-run backup copy
//! - `<name>.dump.sql.<stamp>`  - logical dump script
//! - `<name>.fixed.<stamp>`     - rebuilt store (transient)
//! - `<name>.replaced.<stamp>`  - corrupt original, moved aside
//!
//! The stamp is UTC in basic format with millisecond precision
//! (`YYYYMMDDTHHMMSSmmmZ`), so artifact names sort chronologically and
//! back-to-back runs never collide. One stamp is generated per run and
//! shared by all artifacts of that run.

use std::path::{Path, PathBuf};

use chrono::Utc;

/// Kind of repair artifact, mapped to its filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Byte-identical pre-run copy
    Backup,
    /// Replayable dump script
    Dump,
    /// Rebuilt store awaiting promotion
    Fixed,
    /// Original file moved aside during promotion
    Replaced,
}

impl ArtifactKind {
    /// Filename suffix for this artifact kind.
    pub fn suffix(&self) -> &'static str {
        match self {
            ArtifactKind::Backup => "bak",
            ArtifactKind::Dump => "dump.sql",
            ArtifactKind::Fixed => "fixed",
            ArtifactKind::Replaced => "replaced",
        }
    }
}

/// Generate a run stamp: UTC, basic format, millisecond precision.
pub fn run_stamp() -> String {
    Utc::now().format("%Y%m%dT%H%M%S%3fZ").to_string()
}

/// Build the path of an artifact for the given store file.
///
/// The artifact is a sibling of the store file:
/// `database.mend` -> `database.mend.bak.20260827T101530123Z`
pub fn artifact_path(db_path: &Path, kind: ArtifactKind, stamp: &str) -> PathBuf {
    let name = db_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    let artifact_name = format!("{}.{}.{}", name, kind.suffix(), stamp);
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(artifact_name),
        _ => PathBuf::from(artifact_name),
    }
}
