// src/db.rs
use crate::config::DbSettings;
use crate::errors::PipelineError;
use deadpool_postgres::{Config, Pool, Runtime};
use log::info;
use tokio_postgres::NoTls;

pub type DbPool = Pool;

/// Creates a Deadpool PostgreSQL connection pool from the resolved settings.
///
/// A connection URL wins over the individual host/port/database/user fields.
/// The pool is lazy: the first connection is only made by `pool.get()`.
pub fn create_pool(settings: &DbSettings) -> Result<DbPool, PipelineError> {
    let mut cfg = Config::new();
    match settings {
        DbSettings::Url(url) => cfg.url = Some(url.clone()),
        DbSettings::Params {
            host,
            port,
            dbname,
            user,
            password,
        } => {
            cfg.host = Some(host.clone());
            cfg.port = *port;
            cfg.dbname = Some(dbname.clone());
            cfg.user = user.clone();
            cfg.password = password.clone();
        }
    }

    let pool = cfg
        .create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| PipelineError::DbPoolError(format!("Failed to create database pool: {}", e)))?;

    info!("Created database connection pool ({})", settings.describe());
    Ok(pool)
}
