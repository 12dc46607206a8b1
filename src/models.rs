use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Metadata encoded in a worksheet's name. Shared by every row of that worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetMetadata {
    pub tab_date: NaiveDate,
    pub tab_start_time: NaiveTime,
    pub tab_end_time: NaiveTime,
    pub tab_extra: String, // Not persisted, e.g. "State=Disa"
}

/// One fully coerced row of the `heat_data` table.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub date: NaiveDateTime,
    pub supply: f64,
    pub return_temp_c: f64,
    pub mode: String,
    pub request: String,
    pub state: String,
    pub enabled: bool, // state == "Enable"
    pub note: String,
    pub heating: String,
    pub heating_on: bool, // heating == "On"
    pub heating_group: i32,
    pub date_only: NaiveDate,
    pub time_block_start: String,
    pub time_block_end: String,
    pub timeblockstate: String,
    pub tab_date: NaiveDate,
    pub tab_start_time: NaiveTime,
    pub tab_end_time: NaiveTime,
    // Run-level target table name, not the worksheet's own name
    pub sheet_name: String,
}
