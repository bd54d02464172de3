use chrono::Local;
use gate_core::record::CheckInRecord;
use gate_store::LogStore;
use gate_store::query::{DayGroup, filter_records, group_by_day};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LogsListArgs;
use crate::commands::shared::filter::log_filter;
use crate::commands::shared::limit::effective_limit;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct LogListResponse {
    records: Vec<CheckInRecord>,
}

#[derive(Debug, Serialize)]
struct LogDaysResponse {
    days: Vec<DayGroup>,
}

pub async fn run(args: &LogsListArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let filter = log_filter(&args.filter)?;
    let limit = effective_limit(flags.limit, ctx.config.general.default_limit);

    let records = ctx.store.list_all().await?;
    let today = Local::now().date_naive();
    let mut records = filter_records(&records, &filter, today, &Local);
    records.truncate(usize::try_from(limit)?);

    if args.by_day {
        return output(
            &LogDaysResponse {
                days: group_by_day(&records, &Local),
            },
            flags.format,
        );
    }
    output(&LogListResponse { records }, flags.format)
}
