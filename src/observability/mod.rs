//! Observability for the repair pipeline
//!
//! Per OBSERVABILITY.md:
//! - Structured logs (JSON), one line per event
//! - Deterministic key ordering
//! - Synchronous, no buffering
//!
//! Every run, successful or not, reports the backup path so a human
//! always has a known-good fallback.

mod logger;

pub mod events;

pub use logger::{Logger, Severity};
