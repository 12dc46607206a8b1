use crate::errors::PipelineError;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of one fully loaded worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetSummary {
    pub worksheet: String,
    pub rows_inserted: u64,
    pub blank_rows_skipped: u64,
}

/// Per-worksheet row counts for a run, in document order.
#[derive(Debug)]
pub struct LoadSummary {
    pub worksheets: Vec<WorksheetSummary>,
    start_time: Instant,
}

impl Default for LoadSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadSummary {
    pub fn new() -> Self {
        Self {
            worksheets: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record_worksheet(&mut self, summary: WorksheetSummary) {
        self.worksheets.push(summary);
    }

    pub fn total_rows_inserted(&self) -> u64 {
        self.worksheets.iter().map(|w| w.rows_inserted).sum()
    }

    pub fn total_blank_rows(&self) -> u64 {
        self.worksheets.iter().map(|w| w.blank_rows_skipped).sum()
    }

    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn get_throughput(&self) -> f64 {
        let duration_secs = self.get_total_duration().as_secs_f64();
        if duration_secs > 0.0 {
            self.total_rows_inserted() as f64 / duration_secs
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!("\n========== Load Summary ==========");
        println!("Total Duration: {:.2?}", self.get_total_duration());
        println!("Worksheets Loaded: {}", self.worksheets.len());
        println!("Rows Inserted: {}", self.total_rows_inserted());
        println!("Blank Rows Skipped: {}", self.total_blank_rows());
        println!("Throughput: {:.2} rows/sec", self.get_throughput());
        println!("==================================\n");
    }

    /// Writes one CSV line per worksheet: worksheet, rows_inserted, blank_rows_skipped.
    pub fn write_report(&self, path: &Path) -> Result<(), PipelineError> {
        let to_report_error = |source: csv::Error| PipelineError::Report {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(to_report_error)?;
        for worksheet in &self.worksheets {
            writer.serialize(worksheet).map_err(to_report_error)?;
        }
        writer
            .flush()
            .map_err(|e| to_report_error(csv::Error::from(e)))?;
        Ok(())
    }
}
