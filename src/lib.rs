//! dbmend - integrity repair pipeline for single-file relational stores
//!
//! Detects corruption in an on-disk store, extracts its recoverable
//! logical content, rebuilds a fresh store, and atomically promotes the
//! rebuilt store to the active path while preserving a rollback path.

pub mod artifacts;
pub mod backup;
pub mod cli;
pub mod crash_point;
pub mod dump;
pub mod integrity;
pub mod observability;
pub mod promote;
pub mod rebuild;
pub mod repair;
pub mod store;
