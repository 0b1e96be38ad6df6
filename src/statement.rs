//! Renders finalized column descriptors into a `create table` statement.
//!
//! Identifiers are lower-cased but not quoted or escaped, so adversarial
//! header names can inject SQL. Known limitation; inputs are trusted.

use thiserror::Error;

use crate::schema::{ColumnType, Schema};

/// Raised instead of emitting `create table t ();`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no columns to emit; the input had an empty header row")]
pub struct EmptySchemaError;

pub fn create_table(schema: &Schema, table: &str) -> Result<String, EmptySchemaError> {
    if schema.columns.is_empty() {
        return Err(EmptySchemaError);
    }
    let clauses = schema
        .columns
        .iter()
        .map(|column| {
            let name = column.name.to_lowercase();
            match column.inferred_type {
                ColumnType::Varchar => format!("{name} varchar({})", column.max_width),
                // An all-null column never left Unset; varchar(1) floor keeps
                // the clause valid even when no width was observed.
                ColumnType::Unset => format!("{name} varchar({})", column.max_width.max(1)),
                other => format!("{name} {}", other.keyword()),
            }
        })
        .collect::<Vec<_>>()
        .join(",\n");
    Ok(format!(
        "create table {} (\n{});",
        table.to_lowercase(),
        clauses
    ))
}
