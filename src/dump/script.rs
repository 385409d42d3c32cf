//! Dump script statement format
//!
//! Per REPAIR.md §4.3, a dump script is line-oriented text:
//! - lines starting with `--` are comments, blank lines are ignored
//! - `CREATE TABLE name (col TYPE, ...);` defines a table
//! - `INSERT INTO name VALUES (lit, ...);` inserts a row
//!
//! All schema statements precede all data statements, so replaying the
//! script top to bottom never references an undefined table. Literal
//! syntax lives in `store::Value`; this module owns statement framing.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::store::{Column, ColumnType, TableDef, Value};

/// One replayable statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Define a table
    CreateTable(TableDef),
    /// Insert a row
    Insert {
        /// Target table
        table: String,
        /// Ordered literal values
        values: Vec<Value>,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::CreateTable(def) => {
                write!(f, "CREATE TABLE {} (", def.name)?;
                for (i, col) in def.columns.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", col.name, col.ty)?;
                }
                write!(f, ");")
            }
            Statement::Insert { table, values } => {
                write!(f, "INSERT INTO {} VALUES (", table)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", value.to_literal())?;
                }
                write!(f, ");")
            }
        }
    }
}

fn create_table_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^CREATE TABLE ([A-Za-z_][A-Za-z0-9_]*) \((.+)\);$").unwrap()
    })
}

fn insert_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^INSERT INTO ([A-Za-z_][A-Za-z0-9_]*) VALUES \((.*)\);$").unwrap()
    })
}

/// Parse one statement line.
///
/// Returns `Ok(None)` for blank and comment lines. The error string
/// describes why the line is malformed; callers attach line numbers.
pub fn parse_statement(line: &str) -> Result<Option<Statement>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("--") {
        return Ok(None);
    }

    if let Some(caps) = create_table_re().captures(trimmed) {
        let name = caps[1].to_string();
        let columns = parse_columns(&caps[2])?;
        if columns.is_empty() {
            return Err("table must have at least one column".to_string());
        }
        return Ok(Some(Statement::CreateTable(TableDef::new(name, columns))));
    }

    if let Some(caps) = insert_re().captures(trimmed) {
        let table = caps[1].to_string();
        let values = parse_values(&caps[2])?;
        return Ok(Some(Statement::Insert { table, values }));
    }

    Err(format!("unrecognized statement: {}", trimmed))
}

fn parse_columns(spec: &str) -> Result<Vec<Column>, String> {
    let mut columns = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        let mut words = part.split_whitespace();
        let name = words
            .next()
            .ok_or_else(|| format!("empty column definition in '{}'", spec))?;
        let ty_word = words
            .next()
            .ok_or_else(|| format!("column '{}' is missing a type", name))?;
        if words.next().is_some() {
            return Err(format!("trailing tokens in column definition '{}'", part));
        }
        let ty = ColumnType::parse_keyword(ty_word)
            .ok_or_else(|| format!("unknown column type '{}'", ty_word))?;
        columns.push(Column::new(name, ty));
    }
    Ok(columns)
}

/// Lex a comma-separated literal list, honoring single-quoted text with
/// `''` escapes.
fn parse_values(spec: &str) -> Result<Vec<Value>, String> {
    let mut values = Vec::new();
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;

    loop {
        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
        if i >= chars.len() {
            if values.is_empty() && spec.trim().is_empty() {
                return Err("empty value list".to_string());
            }
            return Err("trailing comma in value list".to_string());
        }

        if chars[i] == '\'' {
            // Quoted text literal
            i += 1;
            let mut text = String::new();
            loop {
                if i >= chars.len() {
                    return Err("unterminated text literal".to_string());
                }
                if chars[i] == '\'' {
                    if i + 1 < chars.len() && chars[i + 1] == '\'' {
                        text.push('\'');
                        i += 2;
                    } else {
                        i += 1;
                        break;
                    }
                } else {
                    text.push(chars[i]);
                    i += 1;
                }
            }
            values.push(Value::Text(text));
        } else {
            // Bare token up to the next comma
            let start = i;
            while i < chars.len() && chars[i] != ',' {
                i += 1;
            }
            let token: String = chars[start..i].iter().collect();
            let token = token.trim();
            values.push(parse_bare_literal(token)?);
        }

        while i < chars.len() && chars[i] == ' ' {
            i += 1;
        }
        if i >= chars.len() {
            return Ok(values);
        }
        if chars[i] != ',' {
            return Err(format!("expected ',' after literal, found '{}'", chars[i]));
        }
        i += 1;
    }
}

fn parse_bare_literal(token: &str) -> Result<Value, String> {
    if token.is_empty() {
        return Err("empty literal".to_string());
    }
    if token == "NULL" {
        return Ok(Value::Null);
    }
    // Non-finite reals print without '.' or an exponent
    if matches!(token, "inf" | "-inf" | "NaN")
        || token.contains('.')
        || token.contains('e')
        || token.contains('E')
    {
        return token
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| format!("invalid real literal '{}'", token));
    }
    token
        .parse::<i64>()
        .map(Value::Integer)
        .map_err(|_| format!("invalid integer literal '{}'", token))
}
