//! Local log storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    ".gate".to_string()
}

fn default_log_file() -> String {
    "visitor_logs.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Directory holding the local log file. Relative paths resolve against
    /// the project root.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// File name of the local JSON Lines log inside `data_dir`.
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_file: default_log_file(),
        }
    }
}

impl StoreConfig {
    /// Full path of the local log file.
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.log_file)
    }
}
