use clap::{Args, Subcommand};

use crate::cli::subcommands::{LogsCommands, PassCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Issue and check visitor passes.
    Pass {
        #[command(subcommand)]
        action: PassCommands,
    },
    /// Run the guard check-in terminal, reading scans from stdin.
    Guard(GuardArgs),
    /// Review, export, and clear the check-in log.
    Logs {
        #[command(subcommand)]
        action: LogsCommands,
    },
    /// Print the JSON Schema of a wire type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct GuardArgs {
    /// Stop after the first logged check-in.
    #[arg(long)]
    pub once: bool,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Schema name (omit to list the available names).
    pub type_name: Option<String>,
}
