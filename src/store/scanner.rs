//! Sequential record scanner
//!
//! Per STORE.md, two read disciplines exist over the same file:
//!
//! - **Strict** (`read_all_strict`): any anomaly aborts with a FATAL
//!   corruption error. Used when the store must be trusted (normal
//!   opens, post-rebuild verification).
//! - **Lenient** (`next_item`): anomalies are classified instead of
//!   aborting. A record whose length prefix is plausible but whose
//!   checksum or body fails validation is reported as `Skipped` and the
//!   scan resumes at the next record. An implausible length prefix or a
//!   truncated file makes the remaining bytes unrecoverable; they are
//!   reported once as `Tail` and the scan ends. Used by integrity
//!   checking and best-effort dumping.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::record::{self, StoreRecord, HEADER_LEN, MIN_RECORD_SIZE};

/// One classified entry from a lenient scan.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanItem {
    /// A record that validated and decoded cleanly
    Record {
        /// Byte offset of the record's length prefix
        offset: u64,
        /// The decoded record
        record: StoreRecord,
    },
    /// A record with a plausible length that failed validation; the
    /// scan resumes after it
    Skipped {
        /// Byte offset of the damaged record
        offset: u64,
        /// Why the record was rejected
        reason: String,
    },
    /// Unrecoverable region at the end of the file; the scan ends here
    Tail {
        /// Byte offset where resynchronization became impossible
        offset: u64,
        /// Why the remainder is unrecoverable
        reason: String,
    },
}

/// Lenient sequential scanner over a store file.
pub struct RecordScanner {
    /// Path to the store file
    path: PathBuf,
    /// Buffered reader
    reader: BufReader<File>,
    /// Current byte offset
    offset: u64,
    /// Total file size
    file_size: u64,
    /// Header validated yet
    header_checked: bool,
    /// Scan hit an unrecoverable region
    done: bool,
}

impl RecordScanner {
    /// Opens the store file for scanning.
    ///
    /// Fails only on filesystem-level errors (file missing, permission
    /// denied). Structural problems are reported by `next_item`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|e| {
            StoreError::read_failed(
                format!("Failed to open store file: {}", path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StoreError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            offset: 0,
            file_size,
            header_checked: false,
            done: false,
        })
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the next classified entry.
    ///
    /// Returns `Ok(None)` at end of file or after a `Tail` entry.
    /// `Err` is reserved for filesystem-level read failures.
    pub fn next_item(&mut self) -> StoreResult<Option<ScanItem>> {
        if self.done {
            return Ok(None);
        }

        if !self.header_checked {
            if let Some(item) = self.check_header()? {
                self.done = true;
                return Ok(Some(item));
            }
        }

        if self.offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.offset;
        if remaining < 4 {
            self.done = true;
            return Ok(Some(ScanItem::Tail {
                offset: self.offset,
                reason: format!("Truncated length prefix: {} bytes remaining", remaining),
            }));
        }

        let mut len_buf = [0u8; 4];
        self.reader
            .read_exact(&mut len_buf)
            .map_err(|e| StoreError::read_failed("Failed to read record length", e))?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE || record_length > remaining {
            self.done = true;
            return Ok(Some(ScanItem::Tail {
                offset: self.offset,
                reason: format!(
                    "Implausible record length {} at offset {} ({} bytes remaining)",
                    record_length, self.offset, remaining
                ),
            }));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader
            .read_exact(&mut record_buf[4..])
            .map_err(|e| StoreError::read_failed("Failed to read record body", e))?;

        let record_offset = self.offset;
        self.offset += record_length;

        match StoreRecord::deserialize(&record_buf) {
            Ok((record, _)) => Ok(Some(ScanItem::Record {
                offset: record_offset,
                record,
            })),
            // Length was plausible, so the next record boundary is known:
            // skip this one and keep scanning.
            Err(e) => Ok(Some(ScanItem::Skipped {
                offset: record_offset,
                reason: e.to_string(),
            })),
        }
    }

    /// Validate the file header. Returns a `Tail` item if the header is
    /// damaged, `None` if it is intact.
    fn check_header(&mut self) -> StoreResult<Option<ScanItem>> {
        self.header_checked = true;

        if self.file_size < HEADER_LEN {
            return Ok(Some(ScanItem::Tail {
                offset: 0,
                reason: format!(
                    "File shorter than store header: {} bytes",
                    self.file_size
                ),
            }));
        }

        let mut header = [0u8; HEADER_LEN as usize];
        self.reader
            .read_exact(&mut header)
            .map_err(|e| StoreError::read_failed("Failed to read store header", e))?;

        match record::parse_header(&header) {
            Ok(_) => {
                self.offset = HEADER_LEN;
                Ok(None)
            }
            Err(e) => Ok(Some(ScanItem::Tail {
                offset: 0,
                reason: e.to_string(),
            })),
        }
    }
}

/// Strict full read: every record must validate.
///
/// Returns all records with their offsets, or a FATAL corruption error
/// at the first anomaly.
pub fn read_all_strict(path: &Path) -> StoreResult<Vec<(u64, StoreRecord)>> {
    let mut scanner = RecordScanner::open(path)?;
    let mut records = Vec::new();

    while let Some(item) = scanner.next_item()? {
        match item {
            ScanItem::Record { offset, record } => records.push((offset, record)),
            ScanItem::Skipped { offset, reason } | ScanItem::Tail { offset, reason } => {
                return Err(StoreError::corruption_at_offset(offset, reason));
            }
        }
    }

    Ok(records)
}
