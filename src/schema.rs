//! Column type inference over a single linear scan of a CSV file.
//!
//! Each column carries a running [`ColumnType`] that only ever widens along
//! the lattice `Unset < SmallInt < Int < BigInt < Decimal < Varchar`, plus
//! the maximum character width observed so far. The null token contributes
//! nothing to type inference but still counts toward width.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::io_utils;

/// Warehouse column types, ordered from narrowest to widest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnType {
    /// No non-null value seen yet; rendered as varchar if it survives the scan.
    Unset,
    SmallInt,
    Int,
    BigInt,
    Decimal,
    Varchar,
}

impl ColumnType {
    pub fn keyword(&self) -> &'static str {
        match self {
            ColumnType::Unset | ColumnType::Varchar => "varchar",
            ColumnType::SmallInt => "smallint",
            ColumnType::Int => "int",
            ColumnType::BigInt => "bigint",
            ColumnType::Decimal => "decimal",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub inferred_type: ColumnType,
    pub max_width: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub columns: Vec<ColumnDescriptor>,
}

impl Schema {
    pub fn from_headers(headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .map(|name| ColumnDescriptor {
                name: name.clone(),
                inferred_type: ColumnType::Unset,
                max_width: 0,
            })
            .collect();
        Schema { columns }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).with_context(|| format!("Creating meta file {path:?}"))?;
        serde_json::to_writer_pretty(file, self).context("Writing metadata JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening meta file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema = serde_json::from_reader(reader).context("Parsing metadata JSON")?;
        Ok(schema)
    }
}

/// A data row whose field count does not match the header row.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("row {row} has {actual} field(s), expected {expected}")]
pub struct RowShapeError {
    pub row: usize,
    pub expected: usize,
    pub actual: usize,
}

/// Outcome of attempting to read a raw field as a literal.
///
/// A closed set of tags so the widening decision in [`classify`] is an
/// explicit switch rather than a catch-all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Integer(i128),
    Float(f64),
    /// Parses as some recognizable literal that is neither integral nor
    /// floating point (boolean, quoted string, bracketed collection).
    Other,
    Unparseable,
}

pub fn try_parse_literal(value: &str) -> Literal {
    if let Ok(parsed) = value.parse::<i128>() {
        return Literal::Integer(parsed);
    }
    if let Ok(parsed) = value.parse::<f64>() {
        // "inf" and "NaN" parse as f64 but are not numeric literals in the
        // input format; they classify as plain text.
        if parsed.is_finite() {
            return Literal::Float(parsed);
        }
        return Literal::Unparseable;
    }
    let trimmed = value.trim();
    let quoted = trimmed.len() >= 2
        && ((trimmed.starts_with('\'') && trimmed.ends_with('\''))
            || (trimmed.starts_with('"') && trimmed.ends_with('"')));
    let bracketed = (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'))
        || (trimmed.starts_with('(') && trimmed.ends_with(')'));
    let word = matches!(trimmed, "true" | "false" | "True" | "False" | "None");
    if quoted || bracketed || word {
        Literal::Other
    } else {
        Literal::Unparseable
    }
}

/// Widens `current` just enough to admit `value`. Never narrows.
pub fn classify(value: &str, current: ColumnType) -> ColumnType {
    match try_parse_literal(value) {
        Literal::Integer(parsed) => {
            if matches!(current, ColumnType::Decimal | ColumnType::Varchar) {
                return current;
            }
            // Open interval bounds match the warehouse's own range checks.
            if parsed > -32768
                && parsed < 32767
                && !matches!(current, ColumnType::Int | ColumnType::BigInt)
            {
                ColumnType::SmallInt
            } else if parsed > -2147483648 && parsed < 2147483647 && current != ColumnType::BigInt {
                ColumnType::Int
            } else {
                ColumnType::BigInt
            }
        }
        Literal::Float(_) => {
            if current == ColumnType::Varchar {
                current
            } else {
                ColumnType::Decimal
            }
        }
        Literal::Other | Literal::Unparseable => ColumnType::Varchar,
    }
}

#[derive(Debug, Clone)]
pub struct InferOptions {
    pub delimiter: u8,
    pub null_token: String,
    /// 0 means scan every row.
    pub sample_rows: usize,
    pub encoding: &'static Encoding,
}

/// Scans `path` once and returns the finalized per-column types and widths.
///
/// The first record is the header; every data row must match its field
/// count or the scan aborts with [`RowShapeError`].
pub fn infer_schema(path: &Path, options: &InferOptions) -> Result<Schema> {
    let mut reader = io_utils::open_csv_reader_from_path(path, options.delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;
    let mut schema = Schema::from_headers(&headers);

    let mut record = csv::ByteRecord::new();
    let mut row = 0usize;
    while reader.read_byte_record(&mut record)? {
        if options.sample_rows > 0 && row >= options.sample_rows {
            break;
        }
        row += 1;
        if record.len() != schema.columns.len() {
            return Err(RowShapeError {
                row,
                expected: schema.columns.len(),
                actual: record.len(),
            }
            .into());
        }
        for (idx, field) in record.iter().enumerate() {
            let text = io_utils::decode_bytes(field, options.encoding)
                .with_context(|| format!("Decoding row {row}"))?;
            let column = &mut schema.columns[idx];
            column.max_width = column.max_width.max(text.chars().count());
            if column.inferred_type == ColumnType::Varchar || text == options.null_token {
                continue;
            }
            column.inferred_type = classify(&text, column.inferred_type);
        }
    }

    Ok(schema)
}
