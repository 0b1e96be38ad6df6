use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Infer warehouse DDL from CSV files and bulk-load them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Infer column types from a CSV file and emit a create-table statement
    Infer(InferArgs),
    /// Create the inferred table and bulk-load the staged file into it
    Load(LoadArgs),
}

#[derive(Debug, Args)]
pub struct InferArgs {
    /// Input CSV file to scan
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Name of the table to create
    #[arg(short = 't', long = "table")]
    pub table: String,
    /// Destination file for the generated statement (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Optional .meta file to persist the inferred schema as JSON
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Text token treated as the null value
    #[arg(long = "null", default_value = "NA")]
    pub null: String,
    /// Number of rows to sample when inferring types (0 means full scan)
    #[arg(long, default_value_t = 0)]
    pub sample_rows: usize,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoadArgs {
    /// Input CSV file to scan for schema inference
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Name of the table to create and load
    #[arg(short = 't', long = "table")]
    pub table: String,
    /// Previously inferred .meta file to reuse instead of re-scanning
    #[arg(short, long)]
    pub meta: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Text token treated as the null value
    #[arg(long = "null", default_value = "NA")]
    pub null: String,
    /// Number of rows to sample when inferring types (0 means full scan)
    #[arg(long, default_value_t = 0)]
    pub sample_rows: usize,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,

    /// Database host name
    #[arg(long)]
    pub host: String,
    /// Database port
    #[arg(long, default_value_t = 5439)]
    pub port: u16,
    /// Database user
    #[arg(long)]
    pub user: String,
    /// Database password
    #[arg(long, env = "CSV_DDL_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Database name
    #[arg(long)]
    pub dbname: String,

    /// Object-storage URI of the staged file (e.g. s3://bucket/data.csv)
    #[arg(long = "storage-uri")]
    pub storage_uri: String,
    /// Access key id for the storage location
    #[arg(long = "access-key-id")]
    pub access_key_id: String,
    /// Secret access key for the storage location
    #[arg(
        long = "secret-access-key",
        env = "CSV_DDL_SECRET_ACCESS_KEY",
        hide_env_values = true
    )]
    pub secret_access_key: String,
    /// Storage region
    #[arg(long)]
    pub region: String,
    /// Number of leading rows the bulk load should skip
    #[arg(long = "ignore-header", default_value_t = 1)]
    pub ignore_header: usize,
    /// Strip surrounding quotes from fields during the bulk load
    #[arg(long = "remove-quotes")]
    pub remove_quotes: bool,
    /// Field delimiter for the bulk load (defaults to the input delimiter)
    #[arg(long = "copy-delimiter", value_parser = parse_delimiter)]
    pub copy_delimiter: Option<u8>,
    /// Print both statements without connecting to the database
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
