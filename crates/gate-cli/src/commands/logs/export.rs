use std::path::PathBuf;

use anyhow::{Context, bail};
use chrono::Local;
use gate_store::LogStore;
use gate_store::export::{default_file_name, export_csv};
use gate_store::query::filter_records;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LogsExportArgs;
use crate::commands::shared::filter::log_filter;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse {
    path: PathBuf,
    rows: usize,
}

pub async fn run(args: &LogsExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = log_filter(&args.filter)?;
    let today = Local::now().date_naive();
    let records = filter_records(&ctx.store.list_all().await?, &filter, today, &Local);
    if records.is_empty() {
        bail!("No logs to export");
    }

    let csv = export_csv(&records, &Local);
    if args.output.as_deref() == Some("-") {
        print!("{csv}");
        return Ok(());
    }

    let path = args
        .output
        .as_ref()
        .map_or_else(|| PathBuf::from(default_file_name(today)), PathBuf::from);
    tokio::fs::write(&path, csv)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    output(
        &ExportResponse {
            path,
            rows: records.len(),
        },
        flags.format,
    )
}
