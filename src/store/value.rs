//! Column types, typed values, and table definitions
//!
//! The store supports three column types (INTEGER, REAL, TEXT) and the
//! NULL value. SQL-literal formatting and parsing live here so the dump
//! script and the rebuilder agree on one representation.

use std::fmt;

/// Column type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Real,
    /// UTF-8 string
    Text,
}

impl ColumnType {
    /// The keyword used in dump scripts.
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text => "TEXT",
        }
    }

    /// Parse a column type keyword.
    pub fn parse_keyword(s: &str) -> Option<Self> {
        match s {
            "INTEGER" => Some(ColumnType::Integer),
            "REAL" => Some(ColumnType::Real),
            "TEXT" => Some(ColumnType::Text),
            _ => None,
        }
    }

    /// On-disk tag byte.
    pub(crate) fn tag(&self) -> u8 {
        match self {
            ColumnType::Integer => 1,
            ColumnType::Real => 2,
            ColumnType::Text => 3,
        }
    }

    /// Decode an on-disk tag byte.
    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(ColumnType::Integer),
            2 => Some(ColumnType::Real),
            3 => Some(ColumnType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A single column definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Column type
    pub ty: ColumnType,
}

impl Column {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// A table definition: name plus ordered typed columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Ordered column definitions
    pub columns: Vec<Column>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self { name: name.into(), columns }
    }

    /// Number of columns
    pub fn arity(&self) -> usize {
        self.columns.len()
    }
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit float
    Real(f64),
    /// UTF-8 string
    Text(String),
}

impl Value {
    /// Whether this value can populate a column of the given type.
    /// NULL is accepted by every column.
    pub fn matches(&self, ty: ColumnType) -> bool {
        match (self, ty) {
            (Value::Null, _) => true,
            (Value::Integer(_), ColumnType::Integer) => true,
            (Value::Real(_), ColumnType::Real) => true,
            (Value::Text(_), ColumnType::Text) => true,
            _ => false,
        }
    }

    /// Format this value as a dump-script literal.
    ///
    /// Text is single-quoted with `''` escaping. Finite reals always
    /// carry a decimal point so they parse back as REAL, not INTEGER;
    /// non-finite reals print as `inf`, `-inf`, `NaN`.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Real(r) => {
                if r.is_finite() && r.fract() == 0.0 && r.abs() < 1e15 {
                    format!("{:.1}", r)
                } else {
                    format!("{}", r)
                }
            }
            Value::Text(s) => {
                let mut out = String::with_capacity(s.len() + 2);
                out.push('\'');
                for c in s.chars() {
                    if c == '\'' {
                        out.push('\'');
                    }
                    out.push(c);
                }
                out.push('\'');
                out
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_literal())
    }
}
