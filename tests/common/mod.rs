//! Shared helpers for integration tests

#![allow(dead_code)]

use std::path::Path;

use dbmend::store::{Column, ColumnType, StoreHandle, TableDef, Value, HEADER_LEN};

/// Build a store with one table `t (id INTEGER, v TEXT)` and the given
/// rows.
pub fn build_store(path: &Path, rows: &[(i64, &str)]) {
    let mut handle = StoreHandle::create(path).unwrap();
    handle
        .create_table(TableDef::new(
            "t",
            vec![
                Column::new("id", ColumnType::Integer),
                Column::new("v", ColumnType::Text),
            ],
        ))
        .unwrap();
    for (id, v) in rows {
        handle
            .insert("t", vec![Value::Integer(*id), Value::Text((*v).to_string())])
            .unwrap();
    }
    handle.sync().unwrap();
}

/// Flip the last checksum byte of the record at `index` (0-based,
/// counting from the first record after the file header). Record 0 is
/// the table definition written by `build_store`.
pub fn corrupt_record(path: &Path, index: usize) {
    let mut bytes = std::fs::read(path).unwrap();
    let mut offset = HEADER_LEN as usize;
    for _ in 0..index {
        let len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
        offset += len;
    }
    let len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
    bytes[offset + len - 1] ^= 0xFF;
    std::fs::write(path, &bytes).unwrap();
}

/// Truncate the file mid-record, leaving a dangling length prefix.
pub fn truncate_last_record(path: &Path) {
    let bytes = std::fs::read(path).unwrap();
    std::fs::write(path, &bytes[..bytes.len() - 5]).unwrap();
}
