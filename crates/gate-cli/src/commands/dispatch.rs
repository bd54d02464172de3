use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Guard(args) => commands::guard::handle(&args, ctx, flags).await,
        Commands::Logs { action } => commands::logs::handle(&action, ctx, flags).await,
        Commands::Pass { .. } | Commands::Schema(_) => {
            unreachable!("pass/schema are pre-dispatched in main")
        }
    }
}
