//! Minimal single-file relational store
//!
//! Per STORE.md, the on-disk format is an append-only record file:
//!
//! ```text
//! +------------------+
//! | Magic "MENDSTOR" | (8 bytes)
//! +------------------+
//! | Format Version   | (u32 LE, currently 1)
//! +------------------+
//! | Record*          | (see record.rs)
//! +------------------+
//! ```
//!
//! Records are table definitions and typed rows, each length-prefixed
//! and CRC32-checksummed. Every read validates the checksum:
//! - strict open (`StoreHandle::open`) aborts on the first anomaly
//! - lenient scan (`RecordScanner`) classifies each entry as record,
//!   skipped, or lost tail, for integrity checking and best-effort dump

mod checksum;
mod errors;
mod handle;
mod record;
mod scanner;
mod value;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StoreError, StoreErrorCode, StoreResult};
pub use handle::StoreHandle;
pub use record::{StoreRecord, HEADER_LEN, MAGIC, MIN_RECORD_SIZE};
pub use scanner::{RecordScanner, ScanItem};
pub use value::{Column, ColumnType, TableDef, Value};
