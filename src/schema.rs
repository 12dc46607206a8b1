//! Header row validation against the fixed worksheet schema.

use crate::errors::SchemaError;

/// Expected header row, column A through L.
pub const EXPECTED_HEADERS: [&str; 12] = [
    "Date",
    "Supply Temp/C",
    "Return Temp/C",
    "Mode",
    "Request",
    "State",
    "Note",
    "Heating",
    "Heating_Group",
    "DateOnly",
    "TimeBlock",
    "TimeBlockState",
];

pub const COLUMN_COUNT: usize = EXPECTED_HEADERS.len();

/// Spreadsheet column letter for a 1-based column position (1 -> A, 27 -> AA).
pub fn column_letter(position: usize) -> String {
    let mut n = position;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Compares the header row position by position with [`EXPECTED_HEADERS`].
///
/// Matching is exact (no trimming, no case folding). Trailing empty cells are
/// range padding, not columns; anything else past column L is an extra column.
/// The error describes the first differing position.
pub fn validate_header<S: AsRef<str>>(header: &[S]) -> Result<(), SchemaError> {
    let used = header
        .iter()
        .rposition(|cell| !cell.as_ref().is_empty())
        .map_or(0, |last| last + 1);

    for (index, &expected) in EXPECTED_HEADERS.iter().enumerate() {
        let position = index + 1;
        if index >= used {
            return Err(SchemaError::MissingColumn {
                position,
                letter: column_letter(position),
                expected,
            });
        }
        let actual = header[index].as_ref();
        if actual != expected {
            return Err(SchemaError::ColumnMismatch {
                position,
                letter: column_letter(position),
                expected,
                actual: actual.to_string(),
            });
        }
    }

    if let Some(index) = (COLUMN_COUNT..used).find(|&i| !header[i].as_ref().is_empty()) {
        let position = index + 1;
        return Err(SchemaError::ExtraColumn {
            position,
            letter: column_letter(position),
            actual: header[index].as_ref().to_string(),
        });
    }

    Ok(())
}
