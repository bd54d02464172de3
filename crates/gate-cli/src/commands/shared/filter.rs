use gate_core::enums::Outcome;
use gate_store::query::{DateFilter, LogFilter};

use crate::cli::subcommands::FilterArgs;

/// Parse a `--status` value. `all` (any case) means no outcome filter.
pub fn parse_status(raw: &str) -> anyhow::Result<Option<Outcome>> {
    let normalized = raw.trim().to_ascii_uppercase();
    if normalized == "ALL" {
        return Ok(None);
    }
    serde_json::from_str(&format!("\"{normalized}\""))
        .map(Some)
        .map_err(|_| {
            anyhow::anyhow!("invalid status '{raw}': expected all, granted, denied, or expired")
        })
}

/// Build a log filter from command-line flags.
pub fn log_filter(args: &FilterArgs) -> anyhow::Result<LogFilter> {
    Ok(LogFilter {
        search: args.search.clone().unwrap_or_default(),
        outcome: args.status.as_deref().map(parse_status).transpose()?.flatten(),
        date: if args.today {
            DateFilter::Today
        } else {
            DateFilter::All
        },
    })
}
