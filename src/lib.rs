pub mod cli;
pub mod io_utils;
pub mod load;
pub mod schema;
pub mod statement;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::cli::{Cli, Commands, InferArgs, LoadArgs};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_ddl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Infer(args) => handle_infer(&args),
        Commands::Load(args) => handle_load(&args),
    }
}

fn handle_infer(args: &InferArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    info!(
        "Inferring schema for '{}' with delimiter '{}'",
        args.input.display(),
        printable_delimiter(delimiter)
    );
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let options = schema::InferOptions {
        delimiter,
        null_token: args.null.clone(),
        sample_rows: args.sample_rows,
        encoding,
    };
    let inferred = schema::infer_schema(&args.input, &options)
        .with_context(|| format!("Inferring schema from {:?}", args.input))?;
    if let Some(meta) = &args.meta {
        inferred
            .save(meta)
            .with_context(|| format!("Writing metadata to {meta:?}"))?;
        info!(
            "Inferred schema for {} column(s) written to {:?}",
            inferred.columns.len(),
            meta
        );
    }
    let statement = statement::create_table(&inferred, &args.table)?;
    match &args.output {
        Some(path) if !io_utils::is_dash(path) => {
            fs::write(path, format!("{statement}\n"))
                .with_context(|| format!("Writing statement to {path:?}"))?;
            info!("Statement written to {path:?}");
        }
        _ => println!("{statement}"),
    }
    Ok(())
}

fn handle_load(args: &LoadArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let inferred = match &args.meta {
        Some(path) => {
            schema::Schema::load(path).with_context(|| format!("Loading metadata from {path:?}"))?
        }
        None => {
            info!(
                "Inferring schema for '{}' with delimiter '{}'",
                args.input.display(),
                printable_delimiter(delimiter)
            );
            let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
            let options = schema::InferOptions {
                delimiter,
                null_token: args.null.clone(),
                sample_rows: args.sample_rows,
                encoding,
            };
            schema::infer_schema(&args.input, &options)
                .with_context(|| format!("Inferring schema from {:?}", args.input))?
        }
    };
    let create = statement::create_table(&inferred, &args.table)?;
    let copy_options = load::CopyOptions {
        storage_uri: args.storage_uri.clone(),
        access_key_id: args.access_key_id.clone(),
        secret_access_key: args.secret_access_key.clone(),
        region: args.region.clone(),
        ignore_header: args.ignore_header,
        null_token: args.null.clone(),
        remove_quotes: args.remove_quotes,
        delimiter: args.copy_delimiter.unwrap_or(delimiter) as char,
    };
    let copy = load::copy_statement(&args.table, &copy_options);
    if args.dry_run {
        println!("{create}\n\n{copy}");
        return Ok(());
    }
    let params = load::ConnectionParams {
        host: args.host.clone(),
        port: args.port,
        user: args.user.clone(),
        password: args.password.clone(),
        dbname: args.dbname.clone(),
    };
    load::execute(&params, &create, &copy)?;
    info!(
        "Loaded '{}' into table '{}'",
        args.storage_uri,
        args.table.to_lowercase()
    );
    Ok(())
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
