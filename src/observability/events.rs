//! Event names emitted by the repair pipeline
//!
//! One constant per event keeps log grepping and test assertions
//! honest. Every event carries the `run_id` field.

/// Repair run started
pub const REPAIR_START: &str = "REPAIR_START";

/// Backup artifact written and verified
pub const BACKUP_COMPLETE: &str = "BACKUP_COMPLETE";

/// Integrity scan finished, verdict attached
pub const INTEGRITY_VERDICT: &str = "INTEGRITY_VERDICT";

/// Store is healthy, no repair needed
pub const REPAIR_HEALTHY: &str = "REPAIR_HEALTHY";

/// Dump script written
pub const DUMP_COMPLETE: &str = "DUMP_COMPLETE";

/// Dump skipped unrecoverable records (non-fatal warning)
pub const DUMP_PARTIAL: &str = "DUMP_PARTIAL";

/// Rebuilt store written and synced
pub const REBUILD_COMPLETE: &str = "REBUILD_COMPLETE";

/// Rebuilt store passed the integrity scan
pub const REBUILD_VERIFIED: &str = "REBUILD_VERIFIED";

/// Rebuilt store promoted to the active path
pub const PROMOTE_COMPLETE: &str = "PROMOTE_COMPLETE";

/// Repair run finished successfully
pub const REPAIR_COMPLETE: &str = "REPAIR_COMPLETE";

/// Repair run failed
pub const REPAIR_FAILED: &str = "REPAIR_FAILED";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake_case() {
        for event in [
            REPAIR_START,
            BACKUP_COMPLETE,
            INTEGRITY_VERDICT,
            REPAIR_HEALTHY,
            DUMP_COMPLETE,
            DUMP_PARTIAL,
            REBUILD_COMPLETE,
            REBUILD_VERIFIED,
            PROMOTE_COMPLETE,
            REPAIR_COMPLETE,
            REPAIR_FAILED,
        ] {
            assert!(
                event.chars().all(|c| c.is_ascii_uppercase() || c == '_'),
                "Event '{}' should be SCREAMING_SNAKE_CASE",
                event
            );
        }
    }
}
