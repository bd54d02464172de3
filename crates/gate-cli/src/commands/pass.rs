mod check;
mod issue;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::PassCommands;

/// Handle `gate pass`.
pub async fn handle(action: &PassCommands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        PassCommands::Issue(args) => issue::run(args, flags),
        PassCommands::Check(args) => check::run(args, flags).await,
    }
}
