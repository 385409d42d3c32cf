//! Crash point injection for testing atomicity
//!
//! Per CRASH_TESTING.md, this module provides crash point injection
//! via the `DBMEND_CRASH_POINT` environment variable.
//!
//! When a crash point is enabled, dbmend immediately terminates via
//! `std::process::abort()` - no cleanup, no unwinding, no catching.
//!
//! # Usage
//!
//! ```ignore
//! use dbmend::crash_point::maybe_crash;
//!
//! // In production code, add crash points at critical locations
//! maybe_crash("promote_between_renames");
//! ```
//!
//! # Testing
//!
//! ```bash
//! DBMEND_CRASH_POINT=promote_between_renames dbmend repair store.mend
//! ```

use std::sync::OnceLock;

/// Cache the crash point name to avoid repeated env var lookups
static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

/// Get the configured crash point (cached)
#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var("DBMEND_CRASH_POINT").ok())
        .as_deref()
}

/// Check if a specific crash point is enabled
///
/// Returns true if `DBMEND_CRASH_POINT` equals the given name.
/// Zero-cost when disabled (env var not set).
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Trigger a crash if the named crash point is enabled
///
/// Immediately terminates the process without cleanup, without
/// unwinding, without catching. Uses `std::process::abort()`.
///
/// This is a no-op when `DBMEND_CRASH_POINT` is not set or doesn't match.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    // Backup crash points
    pub const BACKUP_BEFORE_COPY: &str = "backup_before_copy";
    pub const BACKUP_AFTER_COPY: &str = "backup_after_copy";

    // Dump crash points
    pub const DUMP_AFTER_SCRIPT: &str = "dump_after_script";

    // Rebuild crash points
    pub const REBUILD_AFTER_SYNC: &str = "rebuild_after_sync";

    // Promotion crash points
    pub const PROMOTE_BEFORE_ASIDE: &str = "promote_before_aside";
    pub const PROMOTE_BETWEEN_RENAMES: &str = "promote_between_renames";
    pub const PROMOTE_AFTER_SWAP: &str = "promote_after_swap";

    /// Get all crash point names
    pub fn all() -> &'static [&'static str] {
        &[
            BACKUP_BEFORE_COPY,
            BACKUP_AFTER_COPY,
            DUMP_AFTER_SCRIPT,
            REBUILD_AFTER_SYNC,
            PROMOTE_BEFORE_ASIDE,
            PROMOTE_BETWEEN_RENAMES,
            PROMOTE_AFTER_SWAP,
        ]
    }
}
