//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod adapters;
mod consensus;
mod output;
mod reports;

pub use adapters::{FileBackendConfig, FileLegacyConfig};
pub use consensus::{FileConsensusConfig, FileValidatorConfig};
pub use output::{FileOutputConfig, FileOutputFormat};
pub use reports::{FileLoggingConfig, FileReportsConfig};

use schedule_application::ConsensusParams;
use schedule_domain::{AdapterId, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Golden validator rules
    pub validator: FileValidatorConfig,
    /// Adapter selection and run control
    pub consensus: FileConsensusConfig,
    /// Backend workflow endpoint
    pub backend: FileBackendConfig,
    /// Legacy oracle browser automation
    pub legacy: FileLegacyConfig,
    /// Discrepancy documents and run log
    pub reports: FileReportsConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic log file
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Numeric ranges and enum-like strings in every section
    /// 2. Explicitly enabled adapters whose endpoints are missing
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Per-section validation
        issues.extend(self.validator.validate());
        issues.extend(self.consensus.validate());
        issues.extend(self.backend.validate());
        issues.extend(self.legacy.validate());

        // 2. Endpoints for explicitly listed adapters
        let (listed, _) = self.consensus.parse_adapters();
        if listed.contains(&AdapterId::Backend) && !self.backend.is_configured() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingEndpoint {
                    adapter: "backend".to_string(),
                    field: "backend.url".to_string(),
                },
                "backend adapter enabled without backend.url",
            ));
        }
        if listed.contains(&AdapterId::Legacy) && !self.legacy.is_configured() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingEndpoint {
                    adapter: "legacy".to_string(),
                    field: "legacy.webdriver_url / legacy.page_url".to_string(),
                },
                "legacy adapter enabled without legacy.webdriver_url and legacy.page_url",
            ));
        }

        issues
    }

    /// Adapters to run.
    ///
    /// An explicit `consensus.adapters` list wins. Otherwise golden always
    /// runs, plus backend and legacy when their endpoints are configured.
    pub fn enabled_adapters(&self) -> Vec<AdapterId> {
        let (listed, _) = self.consensus.parse_adapters();
        if !listed.is_empty() {
            return listed;
        }

        let mut ids = vec![AdapterId::Golden];
        if self.backend.is_configured() {
            ids.push(AdapterId::Backend);
        }
        if self.legacy.is_configured() {
            ids.push(AdapterId::Legacy);
        }
        ids
    }

    /// Run control for the consensus use cases
    pub fn consensus_params(&self) -> ConsensusParams {
        ConsensusParams::default()
            .with_adapter_timeout(Duration::from_secs(self.consensus.adapter_timeout_secs.max(1)))
            .with_max_parallel_scenarios(self.consensus.max_parallel_scenarios)
    }
}
