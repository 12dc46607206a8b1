use clap::Parser;
use heat_loader::config::{Cli, DbSettings};
use heat_loader::db::create_pool;
use heat_loader::{load_workbook, DryRunSink, LoadSummary, PgSink, PipelineError, WorkbookFile};
use log::{error, info, warn};
use std::error::Error;
use std::process;

async fn run(cli: &Cli) -> Result<LoadSummary, PipelineError> {
    let mut workbook = WorkbookFile::open(&cli.input_file)?;
    info!("Reading worksheets from {}", workbook.path().display());

    let summary = if cli.dry_run {
        if cli.create_table {
            warn!("--create-table has no effect together with --dry-run");
        }
        info!("Dry run: rows are validated and transformed but not inserted");
        let mut sink = DryRunSink::default();
        load_workbook(&mut workbook, &cli.target_table_name, &mut sink).await?
    } else {
        let settings = DbSettings::resolve(cli.database_url.as_deref())?;
        let pool = create_pool(&settings)?;
        let mut sink = PgSink::connect(&pool).await?;
        if cli.create_table {
            sink.ensure_table().await?;
        }
        load_workbook(&mut workbook, &cli.target_table_name, &mut sink).await?
    };

    if let Some(report_path) = &cli.report {
        summary.write_report(report_path)?;
        info!("Wrote load report to {}", report_path.display());
    }
    Ok(summary)
}

/// Full error text; lower-level causes are appended unless already part of the message.
fn describe_error(err: &PipelineError) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(&format!("\n  caused by: {}", text));
        }
        cause = inner.source();
    }
    message
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    println!("--- Heat data loader ---");
    println!("Input file: {}", cli.input_file.display());
    println!("sheet_name value: {}", cli.target_table_name);

    match run(&cli).await {
        Ok(summary) => summary.print_summary(),
        Err(e) => {
            let message = describe_error(&e);
            error!("Load failed: {}", message);
            eprintln!("ERROR: {}", message);
            process::exit(1);
        }
    }
}
