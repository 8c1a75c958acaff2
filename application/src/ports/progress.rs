//! Progress notification port
//!
//! Defines the interface for reporting progress during consensus runs.

use schedule_domain::{AdapterId, AdapterOutcome, ConsensusReport, RunState, Scenario};

/// Callback for progress updates during consensus runs
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing).
pub trait ConsensusProgressNotifier: Send + Sync {
    /// Called when a scenario starts collecting adapter outcomes
    fn on_scenario_start(&self, scenario: &Scenario, total_adapters: usize);

    /// Called when one adapter finishes (verdict or failure)
    fn on_adapter_complete(&self, scenario: &Scenario, adapter: AdapterId, outcome: &AdapterOutcome);

    /// Called when a scenario's report is final
    fn on_scenario_complete(&self, report: &ConsensusReport);

    /// Called on every run state transition
    fn on_state_change(&self, _scenario_id: &str, _state: RunState) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ConsensusProgressNotifier for NoProgress {
    fn on_scenario_start(&self, _scenario: &Scenario, _total_adapters: usize) {}
    fn on_adapter_complete(&self, _scenario: &Scenario, _adapter: AdapterId, _outcome: &AdapterOutcome) {}
    fn on_scenario_complete(&self, _report: &ConsensusReport) {}
}
