//! Consensus configuration from TOML (`[validator]` and `[consensus]` sections)

use schedule_domain::{AdapterId, ConfigIssue, ConfigIssueCode, DEFAULT_MIN_NIGHTS};
use serde::{Deserialize, Serialize};

/// Raw golden validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidatorConfig {
    /// Minimum nights for a selection to be bookable
    pub min_nights: u32,
}

impl Default for FileValidatorConfig {
    fn default() -> Self {
        Self {
            min_nights: DEFAULT_MIN_NIGHTS,
        }
    }
}

impl FileValidatorConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        if self.min_nights > 7 {
            return vec![ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "validator.min_nights".to_string(),
                    value: u64::from(self.min_nights),
                },
                format!(
                    "validator.min_nights = {} is above 7; every selection will be rejected",
                    self.min_nights
                ),
            )];
        }
        Vec::new()
    }
}

/// Raw consensus run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConsensusConfig {
    /// Adapters to run. Empty means golden plus every adapter with a
    /// configured endpoint.
    pub adapters: Vec<String>,
    /// Per-adapter timeout in seconds
    pub adapter_timeout_secs: u64,
    /// Scenarios evaluated at once in suite mode
    pub max_parallel_scenarios: usize,
}

impl Default for FileConsensusConfig {
    fn default() -> Self {
        Self {
            adapters: Vec::new(),
            adapter_timeout_secs: 60,
            max_parallel_scenarios: 1,
        }
    }
}

impl FileConsensusConfig {
    /// Parse the adapter list.
    ///
    /// Returns the recognized adapters (deduplicated, in listed order) and an
    /// issue per unrecognized name.
    pub fn parse_adapters(&self) -> (Vec<AdapterId>, Vec<ConfigIssue>) {
        let mut ids = Vec::new();
        let mut issues = Vec::new();

        for name in &self.adapters {
            match name.parse::<AdapterId>() {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "consensus.adapters".to_string(),
                        value: name.clone(),
                        valid_values: AdapterId::ALL
                            .iter()
                            .map(|id| id.as_str().to_string())
                            .collect(),
                    },
                    format!("consensus.adapters: unknown adapter '{}'", name),
                )),
            }
        }

        (ids, issues)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_adapters().1;

        if self.adapter_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "consensus.adapter_timeout_secs".to_string(),
                    value: 0,
                },
                "consensus.adapter_timeout_secs cannot be 0",
            ));
        }

        if self.max_parallel_scenarios == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "consensus.max_parallel_scenarios".to_string(),
                    value: 0,
                },
                "consensus.max_parallel_scenarios = 0, running one scenario at a time",
            ));
        }

        issues
    }
}
