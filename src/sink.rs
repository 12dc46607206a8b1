use crate::db::DbPool;
use crate::errors::PipelineError;
use crate::errors::ValueError;
use crate::models::NormalizedRecord;
use crate::transform::time_block_clock;
use async_trait::async_trait;
use chrono::NaiveTime;
use deadpool_postgres::Object;
use log::{debug, info};
use tokio_postgres::types::ToSql;

pub const TARGET_TABLE: &str = "heat_data";

/// Column order of every insert; matches the parameter order in [`PgSink::insert`].
pub const TARGET_COLUMNS: [&str; 19] = [
    "date",
    "supply",
    "return_temp_c",
    "mode",
    "request",
    "state",
    "enabled",
    "note",
    "heating",
    "heating_on",
    "heating_group",
    "date_only",
    "time_block_start",
    "time_block_end",
    "timeblockstate",
    "tab_date",
    "tab_start_time",
    "tab_end_time",
    "sheet_name",
];

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS heat_data (
    date             TIMESTAMP WITHOUT TIME ZONE,
    supply           DOUBLE PRECISION,
    return_temp_c    DOUBLE PRECISION,
    mode             VARCHAR,
    request          VARCHAR,
    state            VARCHAR,
    enabled          BOOLEAN,
    note             VARCHAR,
    heating          VARCHAR,
    heating_on       BOOLEAN,
    heating_group    INTEGER,
    date_only        DATE,
    time_block_start TIME,
    time_block_end   TIME,
    timeblockstate   VARCHAR,
    tab_date         DATE,
    tab_start_time   TIME,
    tab_end_time     TIME,
    sheet_name       VARCHAR
)";

pub fn insert_statement() -> String {
    let placeholders: Vec<String> = (1..=TARGET_COLUMNS.len()).map(|i| format!("${}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TARGET_TABLE,
        TARGET_COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// TimeBlock halves as the TIME values bound for time_block_start and time_block_end.
fn time_block_times(record: &NormalizedRecord) -> Result<(NaiveTime, NaiveTime), PipelineError> {
    let clock = |value: &str| {
        time_block_clock(value).ok_or_else(|| {
            PipelineError::Value(ValueError::new(
                "TimeBlock",
                value,
                "expected a clock value HHMM or HH:MM",
            ))
        })
    };
    Ok((
        clock(&record.time_block_start)?,
        clock(&record.time_block_end)?,
    ))
}

/// Destination for normalized records, fed one row at a time.
#[async_trait]
pub trait RecordSink: Send {
    async fn insert(&mut self, record: &NormalizedRecord) -> Result<(), PipelineError>;
}

/// Inserts into PostgreSQL over a single pooled connection.
///
/// There is no surrounding transaction: every insert commits on its own, so a
/// later failure leaves earlier rows in place.
pub struct PgSink {
    client: Object,
    insert_sql: String,
}

impl PgSink {
    pub async fn connect(pool: &DbPool) -> Result<Self, PipelineError> {
        let client = pool.get().await.map_err(PipelineError::DbConnectionError)?;
        Ok(Self {
            client,
            insert_sql: insert_statement(),
        })
    }

    /// Creates `heat_data` when it does not exist yet.
    pub async fn ensure_table(&self) -> Result<(), PipelineError> {
        self.client
            .batch_execute(CREATE_TABLE_SQL)
            .await
            .map_err(PipelineError::DbQueryError)?;
        info!("Ensured table {} exists", TARGET_TABLE);
        Ok(())
    }
}

#[async_trait]
impl RecordSink for PgSink {
    async fn insert(&mut self, record: &NormalizedRecord) -> Result<(), PipelineError> {
        let (time_block_start, time_block_end) = time_block_times(record)?;
        let statement = self
            .client
            .prepare_cached(&self.insert_sql)
            .await
            .map_err(PipelineError::DbQueryError)?;

        let row_values: [&(dyn ToSql + Sync); 19] = [
            &record.date,
            &record.supply,
            &record.return_temp_c,
            &record.mode,
            &record.request,
            &record.state,
            &record.enabled,
            &record.note,
            &record.heating,
            &record.heating_on,
            &record.heating_group,
            &record.date_only,
            &time_block_start,
            &time_block_end,
            &record.timeblockstate,
            &record.tab_date,
            &record.tab_start_time,
            &record.tab_end_time,
            &record.sheet_name,
        ];

        self.client
            .execute(&statement, &row_values)
            .await
            .map_err(PipelineError::DbQueryError)?;
        Ok(())
    }
}

/// Validates and transforms without a database; only counts what would be inserted.
#[derive(Debug, Default)]
pub struct DryRunSink {
    pub records: u64,
}

#[async_trait]
impl RecordSink for DryRunSink {
    async fn insert(&mut self, record: &NormalizedRecord) -> Result<(), PipelineError> {
        self.records += 1;
        debug!("dry run: would insert {:?}", record);
        Ok(())
    }
}
