use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing database setting: set DATABASE_URL or {variable}")]
    MissingDbSetting { variable: &'static str },
    #[error("Invalid value '{value}' for {variable}: {message}")]
    InvalidDbSetting {
        variable: &'static str,
        value: String,
        message: String,
    },
}

/// Worksheet name does not follow `"{YYYY-MM-DD} {HHMM}  {HHMM} {extra}"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("worksheet name '{name}' is missing {field}")]
    MissingField { name: String, field: &'static str },
    #[error("invalid tab_date '{value}' in worksheet name '{name}': expected YYYY-MM-DD")]
    InvalidDate { name: String, value: String },
    #[error("invalid {field} '{value}' in worksheet name '{name}': expected 24-hour HHMM")]
    InvalidTime {
        name: String,
        field: &'static str,
        value: String,
    },
}

/// Header row differs from the fixed column schema. Positions are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("header mismatch at column {position} ({letter}): expected '{expected}', found '{actual}'")]
    ColumnMismatch {
        position: usize,
        letter: String,
        expected: &'static str,
        actual: String,
    },
    #[error("header is missing column {position} ({letter}): expected '{expected}'")]
    MissingColumn {
        position: usize,
        letter: String,
        expected: &'static str,
    },
    #[error("header has unexpected extra column {position} ({letter}): found '{actual}'")]
    ExtraColumn {
        position: usize,
        letter: String,
        actual: String,
    },
}

impl SchemaError {
    pub fn position(&self) -> usize {
        match self {
            SchemaError::ColumnMismatch { position, .. }
            | SchemaError::MissingColumn { position, .. }
            | SchemaError::ExtraColumn { position, .. } => *position,
        }
    }
}

/// A data cell that could not be coerced for its column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("column '{column}' has invalid value '{value}': {message}")]
pub struct ValueError {
    pub column: &'static str,
    pub value: String,
    pub message: String,
}

impl ValueError {
    pub fn new(column: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration loading failed: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to open workbook {path}: {source}")]
    WorkbookOpen {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },
    #[error("Failed to read worksheet '{worksheet}': {message}")]
    WorksheetRead { worksheet: String, message: String },
    #[error("Invalid worksheet name: {0}")]
    TabName(#[from] FormatError),
    #[error("Invalid header in worksheet '{worksheet}': {source}")]
    Header {
        worksheet: String,
        #[source]
        source: SchemaError,
    },
    #[error("Row {row} in worksheet '{worksheet}': {source}")]
    Row {
        worksheet: String,
        row: u32,
        #[source]
        source: ValueError,
    },
    #[error("Failed to insert row {row} of worksheet '{worksheet}': {source}")]
    Insert {
        worksheet: String,
        row: u32,
        #[source]
        source: Box<PipelineError>,
    },
    #[error("Record cannot be stored: {0}")]
    Value(#[from] ValueError),
    #[error("Database pool creation error: {0}")]
    DbPoolError(String),
    #[error("Database operation failed: {0}")]
    DbQueryError(#[from] tokio_postgres::Error),
    #[error("Failed to get database connection from pool: {0}")]
    DbConnectionError(#[from] deadpool_postgres::PoolError),
    #[error("Failed to write load report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
