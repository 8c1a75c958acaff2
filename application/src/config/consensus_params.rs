//! Consensus run parameters: use case execution control.
//!
//! [`ConsensusParams`] groups the static parameters that control how
//! [`RunConsensusUseCase`](crate::use_cases::run_consensus::RunConsensusUseCase)
//! and [`RunSuiteUseCase`](crate::use_cases::run_suite::RunSuiteUseCase)
//! collect adapter outcomes. These are application-layer concerns, not
//! domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution control for consensus runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Upper bound on a single adapter's evaluation. Exceeding it records a
    /// `TIMEOUT` transport failure for that adapter.
    pub adapter_timeout: Duration,
    /// How many scenarios a suite run evaluates at once.
    pub max_parallel_scenarios: usize,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self {
            adapter_timeout: Duration::from_secs(60),
            max_parallel_scenarios: 1,
        }
    }
}

impl ConsensusParams {
    // ==================== Builder Methods ====================

    pub fn with_adapter_timeout(mut self, timeout: Duration) -> Self {
        self.adapter_timeout = timeout;
        self
    }

    pub fn with_max_parallel_scenarios(mut self, max: usize) -> Self {
        self.max_parallel_scenarios = max.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ConsensusParams::default();
        assert_eq!(params.adapter_timeout, Duration::from_secs(60));
        assert_eq!(params.max_parallel_scenarios, 1);
    }

    #[test]
    fn test_builder() {
        let params = ConsensusParams::default()
            .with_adapter_timeout(Duration::from_millis(250))
            .with_max_parallel_scenarios(0);

        assert_eq!(params.adapter_timeout, Duration::from_millis(250));
        // Zero would stall the suite; clamp to one
        assert_eq!(params.max_parallel_scenarios, 1);
    }
}
