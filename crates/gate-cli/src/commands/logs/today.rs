use chrono::{Local, NaiveDate};
use gate_core::record::CheckInRecord;
use gate_store::LogStore;
use gate_store::query::{DateFilter, LogFilter, filter_records};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct TodayResponse {
    day: NaiveDate,
    count: usize,
    records: Vec<CheckInRecord>,
}

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let day = Local::now().date_naive();
    let filter = LogFilter {
        date: DateFilter::Today,
        ..LogFilter::default()
    };
    let records = filter_records(&ctx.store.list_all().await?, &filter, day, &Local);

    output(
        &TodayResponse {
            day,
            count: records.len(),
            records,
        },
        flags.format,
    )
}
