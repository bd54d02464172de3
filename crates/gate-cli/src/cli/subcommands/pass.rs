use clap::{Args, Subcommand};

/// Visitor pass commands.
#[derive(Clone, Debug, Subcommand)]
pub enum PassCommands {
    /// Issue a pass stamped with the current time.
    Issue(PassIssueArgs),
    /// Evaluate scanned pass text (argument, --file, or stdin).
    Check(PassCheckArgs),
}

#[derive(Clone, Debug, Args)]
pub struct PassIssueArgs {
    /// Visitor full name.
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    /// Identity card number.
    #[arg(long)]
    pub id: String,
    /// Vehicle plate; omit when arriving without a vehicle.
    #[arg(long)]
    pub plate: Option<String>,
    #[arg(long)]
    pub block: String,
    #[arg(long)]
    pub lot: String,
    #[arg(long)]
    pub unit: String,
    /// Print only the encoded pass text.
    #[arg(long)]
    pub encoded_only: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PassCheckArgs {
    /// Pass text as scanned.
    pub text: Option<String>,
    /// Read the pass text from a file.
    #[arg(long, conflicts_with = "text")]
    pub file: Option<String>,
    /// Evaluate at this Unix time in milliseconds instead of now.
    #[arg(long)]
    pub at: Option<i64>,
}
