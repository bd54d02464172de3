use clap::{Args, Subcommand};

/// Check-in log commands.
#[derive(Clone, Debug, Subcommand)]
pub enum LogsCommands {
    /// List check-ins, newest first.
    List(LogsListArgs),
    /// Today's check-ins and their count.
    Today,
    /// Export check-ins as CSV.
    Export(LogsExportArgs),
    /// Delete every check-in record.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
}

/// Filters shared by `list` and `export`.
#[derive(Clone, Debug, Default, Args)]
pub struct FilterArgs {
    /// Match visitor name, IC number, plate, or destination.
    #[arg(long)]
    pub search: Option<String>,
    /// all, granted, denied, or expired.
    #[arg(long)]
    pub status: Option<String>,
    /// Only check-ins from today (local time).
    #[arg(long)]
    pub today: bool,
}

#[derive(Clone, Debug, Args)]
pub struct LogsListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Group rows by check-in day.
    #[arg(long)]
    pub by_day: bool,
}

#[derive(Clone, Debug, Args)]
pub struct LogsExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output path; `-` writes to stdout. Defaults to
    /// `visitor_logs_<today>.csv` in the current directory.
    #[arg(long, short = 'o')]
    pub output: Option<String>,
}
