pub mod config;
pub mod db;
pub mod errors;
pub mod loader;
pub mod models;
pub mod schema;
pub mod sink;
pub mod summary;
pub mod tab_name;
pub mod transform;
pub mod utils;
pub mod workbook;

pub use errors::{FormatError, PipelineError, SchemaError, ValueError};
pub use loader::{load_workbook, load_worksheet};
pub use models::{NormalizedRecord, WorksheetMetadata};
pub use sink::{DryRunSink, PgSink, RecordSink};
pub use summary::{LoadSummary, WorksheetSummary};
pub use workbook::{Worksheet, WorkbookFile, WorksheetSource};
