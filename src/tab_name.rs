//! Worksheet (tab) name parsing.
//!
//! Every worksheet is named after the time span it covers:
//! `"{YYYY-MM-DD} {HHMM}  {HHMM} {extra}"`, e.g. `"2025-03-31 2101  2359 State=Disa"`.
//! Older exports join the time pair with a hyphen (`"2025-03-31 2101-2359 State=Disa"`),
//! which is accepted as well.

use crate::errors::FormatError;
use crate::models::WorksheetMetadata;
use crate::utils::{parse_hhmm, parse_iso_date};
use std::fmt;
use std::str::FromStr;

/// Splits off the next whitespace separated token and returns it with the untouched remainder.
fn next_token(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    Some((&trimmed[..end], &trimmed[end..]))
}

/// Extracts tab_date, tab_start_time, tab_end_time and tab_extra from a worksheet name.
pub fn parse_tab_name(name: &str) -> Result<WorksheetMetadata, FormatError> {
    let missing = |field: &'static str| FormatError::MissingField {
        name: name.to_string(),
        field,
    };
    let invalid_time = |field: &'static str, value: &str| FormatError::InvalidTime {
        name: name.to_string(),
        field,
        value: value.to_string(),
    };

    let (date_token, rest) = next_token(name).ok_or_else(|| missing("tab_date"))?;
    let tab_date = parse_iso_date(date_token).ok_or_else(|| FormatError::InvalidDate {
        name: name.to_string(),
        value: date_token.to_string(),
    })?;

    let (start_token, rest) = next_token(rest).ok_or_else(|| missing("tab_start_time"))?;
    let (start_token, end_token, rest) = match start_token.split_once('-') {
        Some((start, end)) => (start, end, rest),
        None => {
            let (end_token, rest) = next_token(rest).ok_or_else(|| missing("tab_end_time"))?;
            (start_token, end_token, rest)
        }
    };

    let tab_start_time =
        parse_hhmm(start_token).ok_or_else(|| invalid_time("tab_start_time", start_token))?;
    let tab_end_time =
        parse_hhmm(end_token).ok_or_else(|| invalid_time("tab_end_time", end_token))?;

    let tab_extra = rest.trim();
    if tab_extra.is_empty() {
        return Err(missing("tab_extra"));
    }

    Ok(WorksheetMetadata {
        tab_date,
        tab_start_time,
        tab_end_time,
        tab_extra: tab_extra.to_string(),
    })
}

impl FromStr for WorksheetMetadata {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tab_name(s)
    }
}

/// Renders the canonical worksheet name.
impl fmt::Display for WorksheetMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}  {} {}",
            self.tab_date.format("%Y-%m-%d"),
            self.tab_start_time.format("%H%M"),
            self.tab_end_time.format("%H%M"),
            self.tab_extra
        )
    }
}
