use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};
pub use root_commands::Commands;

/// Top-level CLI parser for the `gate` binary.
#[derive(Debug, Parser)]
#[command(name = "gate", version, about = "Gate - condominium visitor check-in")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root path (defaults to the nearest directory holding .gate)
    #[arg(short, long, global = true)]
    pub project: Option<String>,

    /// Color table output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorMode,

    /// Show spinners: auto, on, off
    #[arg(long, global = true, default_value = "auto")]
    pub progress: ProgressMode,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            project: self.project.clone(),
            color: self.color,
            progress: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{LogsCommands, PassCommands};
    use super::{Cli, Commands, GlobalFlags, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "gate", "--format", "table", "--limit", "10", "--verbose", "logs", "today",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Logs {
                action: LogsCommands::Today
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["gate", "guard", "--once", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Guard(ref args) if args.once));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["gate", "--format", "xml", "logs", "today"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn pass_issue_requires_visitor_fields() {
        let parsed = Cli::try_parse_from(["gate", "pass", "issue", "--name", "Ali"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from([
            "gate", "pass", "issue", "--name", "Ali", "--phone", "0123456789", "--id",
            "901020105555", "--block", "A", "--lot", "10", "--unit", "05",
        ])
        .expect("cli should parse");
        let Commands::Pass {
            action: PassCommands::Issue(args),
        } = cli.command
        else {
            panic!("expected pass issue");
        };
        assert_eq!(args.plate, None);
        assert_eq!(args.unit, "05");
    }

    #[test]
    fn logs_list_accepts_filters() {
        let cli = Cli::try_parse_from([
            "gate", "logs", "list", "--search", "wxy", "--status", "expired", "--today",
        ])
        .expect("cli should parse");
        let Commands::Logs {
            action: LogsCommands::List(args),
        } = cli.command
        else {
            panic!("expected logs list");
        };
        assert_eq!(args.filter.search.as_deref(), Some("wxy"));
        assert_eq!(args.filter.status.as_deref(), Some("expired"));
        assert!(args.filter.today);
    }

    #[test]
    fn global_flags_extraction_copies_values() {
        let cli = Cli::try_parse_from(["gate", "--project", "/tmp/lobby", "logs", "today"])
            .expect("cli should parse");
        let flags: GlobalFlags = cli.global_flags();
        assert_eq!(flags.project.as_deref(), Some("/tmp/lobby"));
    }
}
