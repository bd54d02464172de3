mod clear;
mod export;
mod list;
mod today;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::LogsCommands;
use crate::context::AppContext;

/// Handle `gate logs`.
pub async fn handle(
    action: &LogsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        LogsCommands::List(args) => list::run(args, ctx, flags).await,
        LogsCommands::Today => today::run(ctx, flags).await,
        LogsCommands::Export(args) => export::run(args, ctx, flags).await,
        LogsCommands::Clear { yes } => clear::run(*yes, ctx, flags).await,
    }
}
