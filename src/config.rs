use crate::errors::ConfigError;
use clap::Parser;
use std::env;
use std::path::PathBuf;

/// Load heating worksheets from a spreadsheet into the heat_data table.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the spreadsheet (.xlsx, .xlsm, .xls, .ods)
    #[arg(long, value_name = "PATH")]
    pub input_file: PathBuf,

    /// Value stored in the sheet_name column of every inserted row
    #[arg(long, visible_alias = "sheet-name", value_name = "NAME")]
    pub target_table_name: String,

    /// Create heat_data if it does not exist before loading
    #[arg(long)]
    pub create_table: bool,

    /// Validate and transform every worksheet without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Write a per-worksheet CSV report of inserted rows
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// PostgreSQL connection URL; falls back to the PG*_2 variables when unset
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Resolved database connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbSettings {
    Url(String),
    Params {
        host: String,
        port: Option<u16>,
        dbname: String,
        user: Option<String>,
        password: Option<String>,
    },
}

impl DbSettings {
    /// Uses the URL when given, otherwise `PGHOST_2`, `PGPORT_2`, `PGDATABASE_2`,
    /// `PGUSER_2` and `PGPASSWORD_2` from the environment.
    pub fn resolve(database_url: Option<&str>) -> Result<Self, ConfigError> {
        Self::resolve_with(database_url, |key| env::var(key).ok())
    }

    fn resolve_with<F>(database_url: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = database_url.filter(|u| !u.trim().is_empty()) {
            return Ok(DbSettings::Url(url.to_string()));
        }

        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let host = var("PGHOST_2").ok_or(ConfigError::MissingDbSetting {
            variable: "PGHOST_2",
        })?;
        let dbname = var("PGDATABASE_2").ok_or(ConfigError::MissingDbSetting {
            variable: "PGDATABASE_2",
        })?;
        let port = match var("PGPORT_2") {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                ConfigError::InvalidDbSetting {
                    variable: "PGPORT_2",
                    value: raw.clone(),
                    message: e.to_string(),
                }
            })?),
            None => None,
        };

        Ok(DbSettings::Params {
            host,
            port,
            dbname,
            user: var("PGUSER_2"),
            password: var("PGPASSWORD_2"),
        })
    }

    /// Connection description safe for logs (no password).
    pub fn describe(&self) -> String {
        match self {
            DbSettings::Url(url) => match url.rsplit_once('@') {
                Some((_, location)) => format!("url ...@{}", location),
                None => format!("url {}", url),
            },
            DbSettings::Params {
                host, port, dbname, ..
            } => match port {
                Some(port) => format!("{}:{}/{}", host, port, dbname),
                None => format!("{}/{}", host, dbname),
            },
        }
    }
}
