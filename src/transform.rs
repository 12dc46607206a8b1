//! Row transformation: one spreadsheet data row into one [`NormalizedRecord`].

use crate::errors::ValueError;
use crate::models::{NormalizedRecord, WorksheetMetadata};
use crate::schema::EXPECTED_HEADERS;
use crate::utils::{cell_date, cell_float, cell_integer, cell_text, cell_timestamp, parse_clock};
use calamine::Data;
use chrono::NaiveTime;

const DATE: usize = 0;
const SUPPLY: usize = 1;
const RETURN_TEMP: usize = 2;
const MODE: usize = 3;
const REQUEST: usize = 4;
const STATE: usize = 5;
const NOTE: usize = 6;
const HEATING: usize = 7;
const HEATING_GROUP: usize = 8;
const DATE_ONLY: usize = 9;
const TIME_BLOCK: usize = 10;
const TIME_BLOCK_STATE: usize = 11;

static EMPTY: Data = Data::Empty;

/// True iff the state reads exactly "Enable".
pub fn is_enabled(state: &str) -> bool {
    state == "Enable"
}

/// True iff the heating status reads exactly "On".
pub fn is_heating_on(heating: &str) -> bool {
    heating == "On"
}

/// Clock value of one TimeBlock half; surrounding whitespace is ignored.
pub fn time_block_clock(half: &str) -> Option<NaiveTime> {
    parse_clock(half.trim())
}

/// Splits a TimeBlock value `"{start}-{end}"` into its two halves.
///
/// Exactly one hyphen is required and both halves must be `HHMM` or `HH:MM`.
/// The halves are returned exactly as written.
pub fn split_time_block(value: &str) -> Result<(String, String), ValueError> {
    let column = EXPECTED_HEADERS[TIME_BLOCK];
    let hyphens = value.matches('-').count();
    if hyphens != 1 {
        return Err(ValueError::new(
            column,
            value,
            format!("expected exactly one '-' between start and end, found {}", hyphens),
        ));
    }
    let (start, end) = value
        .split_once('-')
        .ok_or_else(|| ValueError::new(column, value, "expected 'start-end'"))?;
    if time_block_clock(start).is_none() || time_block_clock(end).is_none() {
        return Err(ValueError::new(
            column,
            value,
            "start and end must be clock values HHMM or HH:MM",
        ));
    }
    Ok((start.to_string(), end.to_string()))
}

/// Coerces one data row into a record for `heat_data`.
///
/// `row` is aligned to the header schema: missing trailing cells count as
/// empty and cells past the last schema column are ignored. The first cell
/// that fails coercion is reported, in schema order.
pub fn transform_row(
    row: &[Data],
    meta: &WorksheetMetadata,
    sheet_name: &str,
) -> Result<NormalizedRecord, ValueError> {
    let cell = |index: usize| row.get(index).unwrap_or(&EMPTY);
    let column = |index: usize| EXPECTED_HEADERS[index];

    let date = cell_timestamp(column(DATE), cell(DATE))?;
    let supply = cell_float(column(SUPPLY), cell(SUPPLY))?;
    let return_temp_c = cell_float(column(RETURN_TEMP), cell(RETURN_TEMP))?;
    let mode = cell_text(cell(MODE));
    let request = cell_text(cell(REQUEST));
    let state = cell_text(cell(STATE));
    let note = cell_text(cell(NOTE));
    let heating = cell_text(cell(HEATING));
    let heating_group = cell_integer(column(HEATING_GROUP), cell(HEATING_GROUP))?;
    let date_only = cell_date(column(DATE_ONLY), cell(DATE_ONLY))?;
    let (time_block_start, time_block_end) = split_time_block(&cell_text(cell(TIME_BLOCK)))?;
    let timeblockstate = cell_text(cell(TIME_BLOCK_STATE));

    Ok(NormalizedRecord {
        date,
        supply,
        return_temp_c,
        enabled: is_enabled(&state),
        heating_on: is_heating_on(&heating),
        mode,
        request,
        state,
        note,
        heating,
        heating_group,
        date_only,
        time_block_start,
        time_block_end,
        timeblockstate,
        tab_date: meta.tab_date,
        tab_start_time: meta.tab_start_time,
        tab_end_time: meta.tab_end_time,
        sheet_name: sheet_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab_name::parse_tab_name;
    use chrono::{NaiveDate, NaiveTime};

    fn text_row(values: &[&str]) -> Vec<Data> {
        values.iter().map(|v| Data::String(v.to_string())).collect()
    }

    fn sample_row() -> Vec<Data> {
        text_row(&[
            "2025-03-31 21:01:00",
            "55.2",
            "40.1",
            "Heat",
            "Req1",
            "Enable",
            "ok",
            "On",
            "3",
            "2025-03-31",
            "2100-2200",
            "Active",
        ])
    }

    fn meta() -> WorksheetMetadata {
        parse_tab_name("2025-03-31 2101  2359 State=Disa").unwrap()
    }

    #[test]
    fn test_documented_row() {
        let record = transform_row(&sample_row(), &meta(), "heat_2025").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();

        assert_eq!(record.date, day.and_hms_opt(21, 1, 0).unwrap());
        assert_eq!(record.supply, 55.2);
        assert_eq!(record.return_temp_c, 40.1);
        assert_eq!(record.mode, "Heat");
        assert_eq!(record.request, "Req1");
        assert_eq!(record.state, "Enable");
        assert!(record.enabled);
        assert_eq!(record.note, "ok");
        assert_eq!(record.heating, "On");
        assert!(record.heating_on);
        assert_eq!(record.heating_group, 3);
        assert_eq!(record.date_only, day);
        assert_eq!(record.time_block_start, "2100");
        assert_eq!(record.time_block_end, "2200");
        assert_eq!(record.timeblockstate, "Active");
        assert_eq!(record.tab_date, day);
        assert_eq!(record.tab_start_time, NaiveTime::from_hms_opt(21, 1, 0).unwrap());
        assert_eq!(record.tab_end_time, NaiveTime::from_hms_opt(23, 59, 0).unwrap());
        assert_eq!(record.sheet_name, "heat_2025");
    }

    #[test]
    fn test_native_cells() {
        let mut row = sample_row();
        row[SUPPLY] = Data::Float(55.2);
        row[RETURN_TEMP] = Data::Int(40);
        row[HEATING_GROUP] = Data::Float(3.0);
        row[DATE] = Data::DateTimeIso("2025-03-31T21:01:00".to_string());
        let record = transform_row(&row, &meta(), "t").unwrap();
        assert_eq!(record.supply, 55.2);
        assert_eq!(record.return_temp_c, 40.0);
        assert_eq!(record.heating_group, 3);
    }

    #[test]
    fn test_enabled_only_for_exact_enable() {
        assert!(is_enabled("Enable"));
        for other in ["enable", "Enabled", " Enable", "Disable", "", "ENABLE"] {
            assert!(!is_enabled(other), "'{}' must not enable", other);
        }
    }

    #[test]
    fn test_heating_on_only_for_exact_on() {
        assert!(is_heating_on("On"));
        for other in ["on", "ON", "On ", "Off", "Only", ""] {
            assert!(!is_heating_on(other), "'{}' must not be on", other);
        }
    }

    #[test]
    fn test_derived_flags_follow_row_values() {
        let mut row = sample_row();
        row[STATE] = Data::String("Disable".to_string());
        row[HEATING] = Data::String("Off".to_string());
        let record = transform_row(&row, &meta(), "t").unwrap();
        assert!(!record.enabled);
        assert!(!record.heating_on);
        assert_eq!(record.state, "Disable");
        assert_eq!(record.heating, "Off");
    }

    #[test]
    fn test_split_time_block() {
        assert_eq!(
            split_time_block("2100-2200").unwrap(),
            ("2100".to_string(), "2200".to_string())
        );
        assert_eq!(
            split_time_block("08:00-09:30").unwrap(),
            ("08:00".to_string(), "09:30".to_string())
        );
        assert_eq!(
            split_time_block(" 2100 - 2200 ").unwrap(),
            (" 2100 ".to_string(), " 2200 ".to_string())
        );
        assert!(split_time_block("2100").is_err());
        assert!(split_time_block("2100-2200-2300").is_err());
        assert!(split_time_block("").is_err());
        assert!(split_time_block("late-2200").is_err());
    }

    #[test]
    fn test_time_block_halves_are_stored_as_written() {
        let mut row = sample_row();
        row[TIME_BLOCK] = Data::String("21:00 -2200".to_string());
        let record = transform_row(&row, &meta(), "t").unwrap();
        assert_eq!(record.time_block_start, "21:00 ");
        assert_eq!(record.time_block_end, "2200");
        assert_eq!(
            time_block_clock(&record.time_block_start),
            NaiveTime::from_hms_opt(21, 0, 0)
        );
    }

    #[test]
    fn test_multiple_hyphens_name_the_column() {
        let mut row = sample_row();
        row[TIME_BLOCK] = Data::String("2100-2200-2300".to_string());
        let err = transform_row(&row, &meta(), "t").unwrap_err();
        assert_eq!(err.column, "TimeBlock");
        assert_eq!(err.value, "2100-2200-2300");
        assert!(err.message.contains("found 2"));
    }

    #[test]
    fn test_bad_cells_name_their_column() {
        let cases = [
            (DATE, "yesterday", "Date"),
            (SUPPLY, "hot", "Supply Temp/C"),
            (RETURN_TEMP, "", "Return Temp/C"),
            (HEATING_GROUP, "3.5", "Heating_Group"),
            (DATE_ONLY, "31.03.2025", "DateOnly"),
            (TIME_BLOCK, "all day", "TimeBlock"),
        ];
        for (index, value, column) in cases {
            let mut row = sample_row();
            row[index] = Data::String(value.to_string());
            let err = transform_row(&row, &meta(), "t").unwrap_err();
            assert_eq!(err.column, column);
            assert_eq!(err.value, value);
        }
    }

    #[test]
    fn test_short_row_reports_first_missing_required_cell() {
        let row = text_row(&["2025-03-31 21:01:00", "55.2", "40.1", "Heat"]);
        let err = transform_row(&row, &meta(), "t").unwrap_err();
        assert_eq!(err.column, "Heating_Group");
    }

    #[test]
    fn test_cells_past_schema_are_ignored() {
        let mut row = sample_row();
        row.push(Data::String("stray".to_string()));
        assert!(transform_row(&row, &meta(), "t").is_ok());
    }

    #[test]
    fn test_empty_text_cells_become_empty_strings() {
        let mut row = sample_row();
        row[NOTE] = Data::Empty;
        row[MODE] = Data::Int(2);
        let record = transform_row(&row, &meta(), "t").unwrap();
        assert_eq!(record.note, "");
        assert_eq!(record.mode, "2");
    }
}
