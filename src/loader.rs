//! Load orchestration: worksheets in document order, rows in sheet order, one sink.

use crate::errors::PipelineError;
use crate::schema::validate_header;
use crate::sink::RecordSink;
use crate::summary::{LoadSummary, WorksheetSummary};
use crate::tab_name::parse_tab_name;
use crate::transform::transform_row;
use crate::utils::is_blank;
use crate::workbook::{Worksheet, WorksheetSource};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};

fn row_progress(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})",
    ) {
        progress.set_style(style.progress_chars("#>-"));
    }
    progress
}

/// Loads every worksheet of `source` into `sink`.
///
/// `sheet_name` is the run-level value stored in every record's sheet_name
/// column. The first error of any kind stops the run; rows already handed to
/// the sink stay there.
pub async fn load_workbook<W, S>(
    source: &mut W,
    sheet_name: &str,
    sink: &mut S,
) -> Result<LoadSummary, PipelineError>
where
    W: WorksheetSource + ?Sized,
    S: RecordSink + ?Sized,
{
    let mut summary = LoadSummary::new();
    let names = source.sheet_names();
    info!("Loading {} worksheet(s) with sheet_name '{}'", names.len(), sheet_name);

    for name in names {
        let sheet = source.worksheet(&name)?;
        let worksheet_summary = load_worksheet(&sheet, sheet_name, sink).await?;
        summary.record_worksheet(worksheet_summary);
    }

    info!(
        "Loaded {} rows from {} worksheet(s)",
        summary.total_rows_inserted(),
        summary.worksheets.len()
    );
    Ok(summary)
}

/// Validates one worksheet's name and header, then transforms and inserts its rows.
pub async fn load_worksheet<S>(
    sheet: &Worksheet,
    sheet_name: &str,
    sink: &mut S,
) -> Result<WorksheetSummary, PipelineError>
where
    S: RecordSink + ?Sized,
{
    println!("\nProcessing worksheet '{}'", sheet.name());
    info!("Processing worksheet '{}'", sheet.name());

    let meta = parse_tab_name(sheet.name())?;
    validate_header(&sheet.header()).map_err(|source| PipelineError::Header {
        worksheet: sheet.name().to_string(),
        source,
    })?;
    debug!("Worksheet '{}' metadata: {:?}", sheet.name(), meta);

    let mut summary = WorksheetSummary {
        worksheet: sheet.name().to_string(),
        rows_inserted: 0,
        blank_rows_skipped: 0,
    };
    let progress = row_progress(u64::from(sheet.data_row_count()));

    for (row_number, cells) in sheet.data_rows() {
        progress.inc(1);
        if cells.iter().all(is_blank) {
            debug!("Worksheet '{}' row {} is blank, skipping", sheet.name(), row_number);
            summary.blank_rows_skipped += 1;
            continue;
        }

        let inserted = match transform_row(&cells, &meta, sheet_name) {
            Ok(record) => sink.insert(&record).await.map_err(|e| PipelineError::Insert {
                worksheet: sheet.name().to_string(),
                row: row_number,
                source: Box::new(e),
            }),
            Err(source) => Err(PipelineError::Row {
                worksheet: sheet.name().to_string(),
                row: row_number,
                source,
            }),
        };

        if let Err(e) = inserted {
            progress.abandon();
            error!(
                "Worksheet '{}' aborted at row {} after {} rows inserted",
                sheet.name(),
                row_number,
                summary.rows_inserted
            );
            return Err(e);
        }
        summary.rows_inserted += 1;
    }
    progress.finish_and_clear();

    if summary.blank_rows_skipped > 0 {
        warn!(
            "Worksheet '{}': skipped {} blank rows",
            sheet.name(),
            summary.blank_rows_skipped
        );
    }
    println!("Tab '{}': inserted {} rows.", sheet.name(), summary.rows_inserted);
    info!(
        "Worksheet '{}' done: {} rows inserted",
        sheet.name(),
        summary.rows_inserted
    );
    Ok(summary)
}
