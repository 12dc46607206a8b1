use crate::errors::ValueError;
use calamine::Data;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Literal text layout of the Date column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a float that may use comma as decimal separator
pub fn parse_locale_float(s: &str) -> Result<f64, std::num::ParseFloatError> {
    s.replace(',', ".").parse::<f64>()
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parses a 24-hour `HHMM` clock value (exactly four digits).
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = value[..2].parse().ok()?;
    let minute: u32 = value[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parses `HHMM` or `HH:MM`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    match value.split_once(':') {
        Some((hour, minute)) if hour.len() == 2 && minute.len() == 2 => {
            parse_hhmm(&format!("{}{}", hour, minute))
        }
        Some(_) => None,
        None => parse_hhmm(value),
    }
}

/// Spreadsheet serials carry float noise; snap to the nearest whole second.
fn round_to_second(dt: NaiveDateTime) -> NaiveDateTime {
    let nanos = dt.nanosecond();
    let truncated = dt.with_nanosecond(0).unwrap_or(dt);
    if nanos >= 500_000_000 {
        truncated + Duration::seconds(1)
    } else {
        truncated
    }
}

/// Text of a cell as it reads in the sheet. Empty cells become "".
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn invalid(column: &'static str, cell: &Data, message: &str) -> ValueError {
    ValueError::new(column, cell_text(cell), message)
}

pub fn cell_timestamp(column: &'static str, cell: &Data) -> Result<NaiveDateTime, ValueError> {
    let parsed = match cell {
        Data::DateTime(dt) => dt.as_datetime().map(round_to_second),
        Data::DateTimeIso(s) => s.parse::<NaiveDateTime>().ok(),
        Data::String(s) => NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(column, cell, "expected a timestamp YYYY-MM-DD HH:MM:SS"))
}

pub fn cell_float(column: &'static str, cell: &Data) -> Result<f64, ValueError> {
    let parsed = match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_locale_float(s.trim()).ok(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(column, cell, "expected a number"))
}

pub fn cell_integer(column: &'static str, cell: &Data) -> Result<i32, ValueError> {
    let parsed = match cell {
        Data::Int(i) => i32::try_from(*i).ok(),
        Data::Float(f) if f.fract() == 0.0 && *f >= i32::MIN as f64 && *f <= i32::MAX as f64 => {
            Some(*f as i32)
        }
        Data::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(column, cell, "expected a whole number"))
}

pub fn cell_date(column: &'static str, cell: &Data) -> Result<NaiveDate, ValueError> {
    let parsed = match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| round_to_second(d).date()),
        Data::DateTimeIso(s) => s
            .parse::<NaiveDate>()
            .ok()
            .or_else(|| s.parse::<NaiveDateTime>().ok().map(|d| d.date())),
        Data::String(s) => parse_iso_date(s),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(column, cell, "expected a date YYYY-MM-DD"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_float() {
        assert_eq!(parse_locale_float("55,2"), Ok(55.2));
        assert_eq!(parse_locale_float("40.1"), Ok(40.1));
        assert!(parse_locale_float("warm").is_err());
    }

    #[test]
    fn test_parse_clock_forms() {
        let t = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
        assert_eq!(parse_clock("0805"), Some(t));
        assert_eq!(parse_clock("08:05"), Some(t));
        assert_eq!(parse_clock("8:05"), None);
        assert_eq!(parse_clock("2400"), None);
        assert_eq!(parse_clock("noon"), None);
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("0000"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_hhmm("2359"), NaiveTime::from_hms_opt(23, 59, 0));
        assert_eq!(parse_hhmm("1260"), None);
        assert_eq!(parse_hhmm("+123"), None);
        assert_eq!(parse_hhmm("12345"), None);
    }

    #[test]
    fn test_round_to_second() {
        let base = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        let almost = base.and_hms_nano_opt(21, 0, 59, 999_000_000).unwrap();
        assert_eq!(round_to_second(almost), base.and_hms_opt(21, 1, 0).unwrap());
        let just_after = base.and_hms_nano_opt(21, 1, 0, 1_000).unwrap();
        assert_eq!(round_to_second(just_after), base.and_hms_opt(21, 1, 0).unwrap());
    }

    #[test]
    fn test_cell_timestamp() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 31)
            .unwrap()
            .and_hms_opt(21, 1, 0)
            .unwrap();
        let text = Data::String("2025-03-31 21:01:00".to_string());
        assert_eq!(cell_timestamp("Date", &text), Ok(expected));
        let iso = Data::DateTimeIso("2025-03-31T21:01:00".to_string());
        assert_eq!(cell_timestamp("Date", &iso), Ok(expected));

        let err = cell_timestamp("Date", &Data::String("31/03/2025 21:01".to_string())).unwrap_err();
        assert_eq!(err.column, "Date");
        assert_eq!(err.value, "31/03/2025 21:01");
        assert!(cell_timestamp("Date", &Data::Empty).is_err());
        assert!(cell_timestamp("Date", &Data::Float(45747.5)).is_err());
    }

    #[test]
    fn test_cell_float() {
        assert_eq!(cell_float("Supply Temp/C", &Data::Float(55.2)), Ok(55.2));
        assert_eq!(cell_float("Supply Temp/C", &Data::Int(40)), Ok(40.0));
        assert_eq!(cell_float("Supply Temp/C", &Data::String(" 55,2 ".to_string())), Ok(55.2));
        assert!(cell_float("Supply Temp/C", &Data::String("NaN".to_string())).is_err());
        assert!(cell_float("Supply Temp/C", &Data::Empty).is_err());
        assert!(cell_float("Supply Temp/C", &Data::Bool(true)).is_err());
    }

    #[test]
    fn test_cell_integer() {
        assert_eq!(cell_integer("Heating_Group", &Data::Int(3)), Ok(3));
        assert_eq!(cell_integer("Heating_Group", &Data::Float(3.0)), Ok(3));
        assert_eq!(cell_integer("Heating_Group", &Data::String("3".to_string())), Ok(3));
        assert!(cell_integer("Heating_Group", &Data::Float(3.5)).is_err());
        assert!(cell_integer("Heating_Group", &Data::Int(i64::MAX)).is_err());
        assert!(cell_integer("Heating_Group", &Data::String("three".to_string())).is_err());
    }

    #[test]
    fn test_cell_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(cell_date("DateOnly", &Data::String("2025-03-31".to_string())), Ok(expected));
        assert_eq!(cell_date("DateOnly", &Data::DateTimeIso("2025-03-31".to_string())), Ok(expected));
        assert_eq!(
            cell_date("DateOnly", &Data::DateTimeIso("2025-03-31T00:00:00".to_string())),
            Ok(expected)
        );
        assert!(cell_date("DateOnly", &Data::String("2025-03-31 00:00:00".to_string())).is_err());
    }

    #[test]
    fn test_cell_text_and_blank() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::String("Heat".to_string())), "Heat");
        assert_eq!(cell_text(&Data::Int(7)), "7");
        assert!(is_blank(&Data::Empty));
        assert!(is_blank(&Data::String(String::new())));
        assert!(!is_blank(&Data::String(" ".to_string())));
    }
}
