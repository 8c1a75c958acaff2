//! Report and log destinations from TOML (`[reports]` and `[logging]` sections)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw report output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReportsConfig {
    /// Directory for discrepancy markdown documents
    pub dir: PathBuf,
    /// JSONL file receiving every consensus report
    pub run_log: Option<PathBuf>,
}

impl Default for FileReportsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("discrepancies"),
            run_log: None,
        }
    }
}

/// Raw diagnostic logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Also write tracing output to this file
    pub file: Option<PathBuf>,
}
