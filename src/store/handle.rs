//! Store connection lifecycle
//!
//! `StoreHandle` owns an open store file: it creates or strictly opens
//! the file, keeps the catalog and rows in memory, and appends records
//! write-through. Durability is explicit via `sync`.

use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::record::{self, StoreRecord};
use super::scanner::read_all_strict;
use super::value::{TableDef, Value};

/// An open store file with its decoded content.
#[derive(Debug)]
pub struct StoreHandle {
    /// Path to the store file
    path: PathBuf,
    /// Append handle
    file: std::fs::File,
    /// Table definitions by name
    catalog: BTreeMap<String, TableDef>,
    /// Rows by table name, in insertion order
    rows: BTreeMap<String, Vec<Vec<Value>>>,
}

impl StoreHandle {
    /// Create a brand-new, empty store file.
    ///
    /// Fails if the file already exists: a fresh store must never clobber
    /// an existing one.
    pub fn create(path: &Path) -> StoreResult<Self> {
        let mut file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(path)
            .map_err(|e| {
                StoreError::write_failed(
                    format!("Failed to create store file: {}", path.display()),
                    e,
                )
            })?;

        file.write_all(&record::file_header())
            .map_err(|e| StoreError::write_failed("Failed to write store header", e))?;
        file.sync_all()
            .map_err(|e| StoreError::io_error("Failed to fsync new store file", e))?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            catalog: BTreeMap::new(),
            rows: BTreeMap::new(),
        })
    }

    /// Open an existing store file, strictly.
    ///
    /// Every record is checksum-validated; any anomaly is a FATAL
    /// corruption error. Recovery of damaged stores goes through the
    /// lenient scanner, never through this path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let records = read_all_strict(path)?;

        let mut catalog = BTreeMap::new();
        let mut rows: BTreeMap<String, Vec<Vec<Value>>> = BTreeMap::new();

        for (offset, record) in records {
            match record {
                StoreRecord::Table(def) => {
                    if catalog.contains_key(&def.name) {
                        return Err(StoreError::corruption_at_offset(
                            offset,
                            format!("Duplicate table definition: {}", def.name),
                        ));
                    }
                    rows.insert(def.name.clone(), Vec::new());
                    catalog.insert(def.name.clone(), def);
                }
                StoreRecord::Row { table, values } => {
                    match rows.get_mut(&table) {
                        Some(table_rows) => table_rows.push(values),
                        None => {
                            return Err(StoreError::corruption_at_offset(
                                offset,
                                format!("Row references unknown table: {}", table),
                            ));
                        }
                    }
                }
            }
        }

        let file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| {
                StoreError::io_error(
                    format!("Failed to reopen store file for append: {}", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            file,
            catalog,
            rows,
        })
    }

    /// Returns the store file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Define a new table.
    pub fn create_table(&mut self, def: TableDef) -> StoreResult<()> {
        if self.catalog.contains_key(&def.name) {
            return Err(StoreError::schema_violation(format!(
                "Table already exists: {}",
                def.name
            )));
        }

        self.append_record(&StoreRecord::Table(def.clone()))?;
        self.rows.insert(def.name.clone(), Vec::new());
        self.catalog.insert(def.name.clone(), def);
        Ok(())
    }

    /// Insert a row into a table.
    ///
    /// The table must exist, the value count must match the table arity,
    /// and each value must be compatible with its column type.
    pub fn insert(&mut self, table: &str, values: Vec<Value>) -> StoreResult<()> {
        let def = self.catalog.get(table).ok_or_else(|| {
            StoreError::schema_violation(format!("Unknown table: {}", table))
        })?;

        if values.len() != def.arity() {
            return Err(StoreError::schema_violation(format!(
                "Table {} expects {} values, got {}",
                table,
                def.arity(),
                values.len()
            )));
        }

        for (value, column) in values.iter().zip(&def.columns) {
            if !value.matches(column.ty) {
                return Err(StoreError::schema_violation(format!(
                    "Value {} does not fit column {}.{} ({})",
                    value.to_literal(),
                    table,
                    column.name,
                    column.ty
                )));
            }
        }

        self.append_record(&StoreRecord::Row {
            table: table.to_string(),
            values: values.clone(),
        })?;

        self.rows.entry(table.to_string()).or_default().push(values);
        Ok(())
    }

    /// fsync the store file.
    pub fn sync(&self) -> StoreResult<()> {
        self.file
            .sync_all()
            .map_err(|e| StoreError::io_error("Failed to fsync store file", e))
    }

    /// Names of all defined tables, sorted.
    pub fn table_names(&self) -> Vec<&str> {
        self.catalog.keys().map(|s| s.as_str()).collect()
    }

    /// Definition of a table, if it exists.
    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.catalog.get(name)
    }

    /// Rows of a table, in insertion order.
    pub fn rows(&self, table: &str) -> StoreResult<&[Vec<Value>]> {
        self.rows
            .get(table)
            .map(|r| r.as_slice())
            .ok_or_else(|| StoreError::schema_violation(format!("Unknown table: {}", table)))
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: &str) -> StoreResult<u64> {
        Ok(self.rows(table)?.len() as u64)
    }

    fn append_record(&mut self, record: &StoreRecord) -> StoreResult<()> {
        self.file
            .write_all(&record.serialize())
            .map_err(|e| StoreError::write_failed("Failed to append store record", e))
    }
}
