//! Store record types
//!
//! Per STORE.md, the record format is:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, total including this field)
//! +------------------+
//! | Record Tag       | (u8: 1 = table definition, 2 = row)
//! +------------------+
//! | Record Payload   | (tag-dependent, see below)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Table payload: name (length-prefixed), column count (u32 LE), then
//! per column: name (length-prefixed) + type tag (u8).
//!
//! Row payload: table name (length-prefixed), value count (u32 LE), then
//! per value: type tag (u8: 0 NULL, 1 INTEGER i64 LE, 2 REAL f64 LE,
//! 3 TEXT length-prefixed) + payload.
//!
//! Checksum covers the length prefix and the body, not itself.

use std::io::{self, Read};

use super::value::{Column, ColumnType, TableDef, Value};

/// File magic, first 8 bytes of every store file
pub const MAGIC: &[u8; 8] = b"MENDSTOR";

/// Current on-disk format version
pub const FORMAT_VERSION: u32 = 1;

/// Header length: magic + format version
pub const HEADER_LEN: u64 = 12;

/// Smallest possible record: length + tag + empty name + zero count + checksum
pub const MIN_RECORD_SIZE: u64 = 4 + 1 + 4 + 4 + 4;

const TAG_TABLE: u8 = 1;
const TAG_ROW: u8 = 2;

const VALUE_NULL: u8 = 0;
const VALUE_INTEGER: u8 = 1;
const VALUE_REAL: u8 = 2;
const VALUE_TEXT: u8 = 3;

/// Serialize the file header.
pub fn file_header() -> [u8; HEADER_LEN as usize] {
    let mut header = [0u8; HEADER_LEN as usize];
    header[..8].copy_from_slice(MAGIC);
    header[8..].copy_from_slice(&FORMAT_VERSION.to_le_bytes());
    header
}

/// Validate a file header, returning the format version.
pub fn parse_header(data: &[u8]) -> io::Result<u32> {
    if data.len() < HEADER_LEN as usize {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "File shorter than store header",
        ));
    }
    if &data[..8] != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Bad store magic",
        ));
    }
    let version = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
    if version != FORMAT_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Unsupported store format version: {}", version),
        ));
    }
    Ok(version)
}

/// A single logical record as stored on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRecord {
    /// A table definition
    Table(TableDef),
    /// A row belonging to a table
    Row {
        /// Name of the table this row belongs to
        table: String,
        /// Ordered cell values
        values: Vec<Value>,
    },
}

impl StoreRecord {
    /// Serialize the record body (everything except length prefix and
    /// checksum). This is part of the data the checksum covers.
    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::new();

        match self {
            StoreRecord::Table(def) => {
                buf.push(TAG_TABLE);
                write_string(&mut buf, &def.name);
                buf.extend_from_slice(&(def.columns.len() as u32).to_le_bytes());
                for col in &def.columns {
                    write_string(&mut buf, &col.name);
                    buf.push(col.ty.tag());
                }
            }
            StoreRecord::Row { table, values } => {
                buf.push(TAG_ROW);
                write_string(&mut buf, table);
                buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
                for value in values {
                    match value {
                        Value::Null => buf.push(VALUE_NULL),
                        Value::Integer(i) => {
                            buf.push(VALUE_INTEGER);
                            buf.extend_from_slice(&i.to_le_bytes());
                        }
                        Value::Real(r) => {
                            buf.push(VALUE_REAL);
                            buf.extend_from_slice(&r.to_le_bytes());
                        }
                        Value::Text(s) => {
                            buf.push(VALUE_TEXT);
                            write_string(&mut buf, s);
                        }
                    }
                }
            }
        }

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();

        // Record length = 4 (length) + body.len() + 4 (checksum)
        let record_length = (4 + body.len() + 4) as u32;

        // Checksum covers: length + body
        let mut checksum_data = Vec::with_capacity(4 + body.len());
        checksum_data.extend_from_slice(&record_length.to_le_bytes());
        checksum_data.extend_from_slice(&body);
        let checksum = super::checksum::compute_checksum(&checksum_data);

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if (data.len() as u64) < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if (record_length as u64) < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        // Extract and verify checksum
        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);

        let checksum_data = &data[0..checksum_offset];
        let computed_checksum = super::checksum::compute_checksum(checksum_data);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        // Parse body
        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        let mut tag_buf = [0u8; 1];
        cursor.read_exact(&mut tag_buf)?;

        let record = match tag_buf[0] {
            TAG_TABLE => {
                let name = read_string(&mut cursor)?;
                let column_count = read_u32(&mut cursor)? as usize;
                let mut columns = Vec::with_capacity(column_count);
                for _ in 0..column_count {
                    let col_name = read_string(&mut cursor)?;
                    let mut ty_buf = [0u8; 1];
                    cursor.read_exact(&mut ty_buf)?;
                    let ty = ColumnType::from_tag(ty_buf[0]).ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            format!("Unknown column type tag: {}", ty_buf[0]),
                        )
                    })?;
                    columns.push(Column::new(col_name, ty));
                }
                StoreRecord::Table(TableDef::new(name, columns))
            }
            TAG_ROW => {
                let table = read_string(&mut cursor)?;
                let value_count = read_u32(&mut cursor)? as usize;
                let mut values = Vec::with_capacity(value_count);
                for _ in 0..value_count {
                    let mut vtag = [0u8; 1];
                    cursor.read_exact(&mut vtag)?;
                    let value = match vtag[0] {
                        VALUE_NULL => Value::Null,
                        VALUE_INTEGER => {
                            let mut b = [0u8; 8];
                            cursor.read_exact(&mut b)?;
                            Value::Integer(i64::from_le_bytes(b))
                        }
                        VALUE_REAL => {
                            let mut b = [0u8; 8];
                            cursor.read_exact(&mut b)?;
                            Value::Real(f64::from_le_bytes(b))
                        }
                        VALUE_TEXT => Value::Text(read_string(&mut cursor)?),
                        other => {
                            return Err(io::Error::new(
                                io::ErrorKind::InvalidData,
                                format!("Unknown value tag: {}", other),
                            ));
                        }
                    };
                    values.push(value);
                }
                StoreRecord::Row { table, values }
            }
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("Unknown record tag: {}", other),
                ));
            }
        };

        Ok((record, record_length))
    }
}

fn write_string(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

fn read_u32<R: Read>(reader: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
    let len = read_u32(reader)? as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e)))
}
