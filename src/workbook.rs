//! Spreadsheet access: opening a workbook and reading worksheets in document order.

use crate::errors::PipelineError;
use crate::schema::COLUMN_COUNT;
use crate::utils::cell_text;
use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

static EMPTY: Data = Data::Empty;

/// One worksheet: its name and its cell range.
#[derive(Debug, Clone)]
pub struct Worksheet {
    name: String,
    range: Range<Data>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell at an absolute (row, column) position; positions outside the used range are empty.
    fn cell(&self, row: u32, col: u32) -> &Data {
        self.range.get_value((row, col)).unwrap_or(&EMPTY)
    }

    fn last_row(&self) -> Option<u32> {
        self.range.end().map(|(row, _)| row)
    }

    /// Row 1 as text, from column A through the last used column.
    pub fn header(&self) -> Vec<String> {
        let width = self.range.end().map_or(0, |(_, col)| col + 1);
        (0..width).map(|col| cell_text(self.cell(0, col))).collect()
    }

    /// Number of rows below the header, blank ones included.
    pub fn data_row_count(&self) -> u32 {
        self.last_row().unwrap_or(0)
    }

    /// Rows below the header with their spreadsheet row number (the first data row is 2).
    /// Each row holds exactly the schema's columns A through L.
    pub fn data_rows(&self) -> impl Iterator<Item = (u32, Vec<Data>)> + '_ {
        let last_row = self.last_row().unwrap_or(0);
        (1..=last_row).map(move |row| {
            let cells = (0..COLUMN_COUNT as u32)
                .map(|col| self.cell(row, col).clone())
                .collect();
            (row + 1, cells)
        })
    }
}

/// Anything that yields worksheets by name, in document order.
pub trait WorksheetSource {
    fn sheet_names(&self) -> Vec<String>;
    fn worksheet(&mut self, name: &str) -> Result<Worksheet, PipelineError>;
}

/// A spreadsheet file on disk (xlsx, xlsm, xlsb, xls or ods).
pub struct WorkbookFile {
    path: PathBuf,
    sheets: Sheets<BufReader<File>>,
}

impl WorkbookFile {
    pub fn open(path: &Path) -> Result<Self, PipelineError> {
        let sheets = open_workbook_auto(path).map_err(|source| PipelineError::WorkbookOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "Opened workbook {} with {} worksheet(s)",
            path.display(),
            sheets.sheet_names().len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            sheets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorksheetSource for WorkbookFile {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names()
    }

    fn worksheet(&mut self, name: &str) -> Result<Worksheet, PipelineError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|e| PipelineError::WorksheetRead {
                worksheet: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(Worksheet::new(name, range))
    }
}

/// In-memory worksheets, mostly for tests and generated input.
impl WorksheetSource for Vec<Worksheet> {
    fn sheet_names(&self) -> Vec<String> {
        self.iter().map(|sheet| sheet.name.clone()).collect()
    }

    fn worksheet(&mut self, name: &str) -> Result<Worksheet, PipelineError> {
        self.iter()
            .find(|sheet| sheet.name == name)
            .cloned()
            .ok_or_else(|| PipelineError::WorksheetRead {
                worksheet: name.to_string(),
                message: "no such worksheet".to_string(),
            })
    }
}

/// Builds a range from rows of cells anchored at A1.
#[cfg(test)]
pub(crate) fn range_from_rows(rows: &[Vec<Data>]) -> Range<Data> {
    let height = rows.len() as u32;
    let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
    if height == 0 || width == 0 {
        return Range::empty();
    }
    let mut range = Range::new((0, 0), (height - 1, width - 1));
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            range.set_value((r as u32, c as u32), value.clone());
        }
    }
    range
}
