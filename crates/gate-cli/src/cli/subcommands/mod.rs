mod logs;
mod pass;

pub use logs::{FilterArgs, LogsCommands, LogsExportArgs, LogsListArgs};
pub use pass::{PassCheckArgs, PassCommands, PassIssueArgs};
