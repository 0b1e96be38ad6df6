//! Builds the bulk-load statement and runs both statements against the
//! warehouse connection.
//!
//! The create and the copy execute as two independent implicit transactions.
//! There is no retry and no rollback: a failure after the create leaves the
//! table in place but unloaded, and the caller decides what to do with it.

use log::info;
use postgres::{Client, Config, NoTls};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("connecting to {host}:{port}/{dbname}")]
    Connect {
        host: String,
        port: u16,
        dbname: String,
        #[source]
        source: postgres::Error,
    },
    #[error("executing create-table statement")]
    CreateTable(#[source] postgres::Error),
    #[error("executing bulk-load statement")]
    Copy(#[source] postgres::Error),
}

#[derive(Debug, Clone)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

/// Everything the copy statement needs; all configuration, none inferred.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    pub storage_uri: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub ignore_header: usize,
    pub null_token: String,
    pub remove_quotes: bool,
    pub delimiter: char,
}

pub fn copy_statement(table: &str, options: &CopyOptions) -> String {
    let mut statement = format!(
        "copy {} from '{}'\n    access_key_id '{}'\n    secret_access_key '{}'\n    region '{}'\n    ignoreheader {}\n    null as '{}'",
        table.to_lowercase(),
        options.storage_uri,
        options.access_key_id,
        options.secret_access_key,
        options.region,
        options.ignore_header,
        options.null_token,
    );
    if options.remove_quotes {
        statement.push_str("\n    removequotes");
    }
    statement.push_str(&format!("\n    delimiter '{}';", options.delimiter));
    statement
}

/// Executes `create` then `copy` on a fresh connection. The connection is
/// dropped when this returns, on success or failure.
pub fn execute(params: &ConnectionParams, create: &str, copy: &str) -> Result<(), LoadError> {
    let mut client = connect(params)?;
    info!(
        "Connected to {}:{}/{}",
        params.host, params.port, params.dbname
    );
    client
        .batch_execute(create)
        .map_err(LoadError::CreateTable)?;
    info!("Created table");
    client.batch_execute(copy).map_err(LoadError::Copy)?;
    info!("Bulk load complete");
    Ok(())
}

fn connect(params: &ConnectionParams) -> Result<Client, LoadError> {
    Config::new()
        .host(&params.host)
        .port(params.port)
        .user(&params.user)
        .password(&params.password)
        .dbname(&params.dbname)
        .connect(NoTls)
        .map_err(|source| LoadError::Connect {
            host: params.host.clone(),
            port: params.port,
            dbname: params.dbname.clone(),
            source,
        })
}
