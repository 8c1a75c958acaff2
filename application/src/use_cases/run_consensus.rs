//! Run Consensus use case
//!
//! Collects every adapter's outcome for one scenario and hands them to the
//! domain [`ConsensusEngine`].
//!
//! # Flow
//!
//! ```text
//! PENDING ──▶ COLLECTING ──▶ COMPARED ──▶ APPROVED | REJECTED | ESCALATED
//!               │
//!               ├─ golden  ─┐
//!               ├─ backend ─┼─ concurrent, each under adapter_timeout
//!               └─ legacy  ─┘
//! ```
//!
//! A timed-out, panicked, or cancelled adapter is recorded as a transport
//! failure rather than dropped, so the report always has one entry per
//! adapter. Failed adapters are not retried within a run.

use crate::config::ConsensusParams;
use crate::ports::progress::{ConsensusProgressNotifier, NoProgress};
use crate::ports::validator_adapter::ValidatorAdapter;
use schedule_domain::{
    AdapterId, AdapterOutcome, ConsensusEngine, ConsensusReport, RunState, Scenario,
    TransportReason,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that prevent a consensus run from starting
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunConsensusError {
    #[error("No validator adapters configured")]
    NoAdapters,

    #[error("Adapter {0} configured more than once")]
    DuplicateAdapter(AdapterId),
}

/// Use case for running one scenario through every adapter
pub struct RunConsensusUseCase {
    adapters: Vec<Arc<dyn ValidatorAdapter>>,
    params: ConsensusParams,
}

impl RunConsensusUseCase {
    pub fn new(adapters: Vec<Arc<dyn ValidatorAdapter>>, params: ConsensusParams) -> Self {
        Self { adapters, params }
    }

    /// Identities of the configured adapters, in configuration order
    pub fn adapter_ids(&self) -> Vec<AdapterId> {
        self.adapters.iter().map(|a| a.id()).collect()
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, scenario: Scenario) -> Result<ConsensusReport, RunConsensusError> {
        self.execute_with_progress(scenario, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and a cancellation token
    ///
    /// Cancelling aborts adapters still in flight; outcomes already captured
    /// are kept and the missing adapters are recorded as unreachable.
    pub async fn execute_with_progress(
        &self,
        scenario: Scenario,
        progress: &dyn ConsensusProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<ConsensusReport, RunConsensusError> {
        self.check_adapters()?;

        progress.on_state_change(&scenario.id, RunState::Pending);
        info!(
            "Scenario {}: running {} adapters on {}",
            scenario.id,
            self.adapters.len(),
            scenario.selection.index_notation()
        );

        // One shared, immutable scenario for every adapter
        let scenario = Arc::new(scenario);
        let per_adapter = self.collect(&scenario, progress, cancel).await;

        progress.on_state_change(&scenario.id, RunState::Compared);
        let scenario = Arc::try_unwrap(scenario).unwrap_or_else(|shared| (*shared).clone());
        let report = ConsensusEngine::compare(scenario, per_adapter);

        for discrepancy in &report.discrepancies {
            warn!(
                "Scenario {}: {} - {}",
                report.scenario.id, discrepancy.kind, discrepancy.message
            );
        }
        info!(
            "Scenario {}: {} ({} discrepancies)",
            report.scenario.id,
            report.recommendation,
            report.discrepancies.len()
        );

        progress.on_state_change(&report.scenario.id, report.state);
        progress.on_scenario_complete(&report);
        Ok(report)
    }

    fn check_adapters(&self) -> Result<(), RunConsensusError> {
        if self.adapters.is_empty() {
            return Err(RunConsensusError::NoAdapters);
        }
        let mut seen = BTreeSet::new();
        for adapter in &self.adapters {
            if !seen.insert(adapter.id()) {
                return Err(RunConsensusError::DuplicateAdapter(adapter.id()));
            }
        }
        Ok(())
    }

    /// Query all adapters in parallel
    async fn collect(
        &self,
        scenario: &Arc<Scenario>,
        progress: &dyn ConsensusProgressNotifier,
        cancel: &CancellationToken,
    ) -> BTreeMap<AdapterId, AdapterOutcome> {
        progress.on_state_change(&scenario.id, RunState::Collecting);
        progress.on_scenario_start(scenario, self.adapters.len());

        let mut join_set = JoinSet::new();

        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let scenario = Arc::clone(scenario);
            let timeout = self.params.adapter_timeout;

            join_set.spawn(async move {
                let id = adapter.id();
                let outcome = Self::evaluate_with_timeout(adapter.as_ref(), &scenario, timeout).await;
                (id, outcome)
            });
        }

        let mut collected = BTreeMap::new();
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled(), if !cancelled => {
                    warn!(
                        "Scenario {}: cancelled with {} adapters still running",
                        scenario.id,
                        join_set.len()
                    );
                    join_set.abort_all();
                    cancelled = true;
                }
                next = join_set.join_next() => match next {
                    None => break,
                    Some(Ok((id, outcome))) => {
                        match &outcome {
                            AdapterOutcome::Verdict(v) => debug!(
                                "Adapter {} verdict: valid={:?} nights={:?}",
                                id, v.is_valid, v.nights_count
                            ),
                            AdapterOutcome::Failure(f) => warn!(
                                "Adapter {} failed: {} ({})",
                                id, f.reason, f.detail
                            ),
                        }
                        progress.on_adapter_complete(scenario, id, &outcome);
                        collected.insert(id, outcome);
                    }
                    Some(Err(e)) if e.is_cancelled() => {
                        debug!("Adapter task aborted: {}", e);
                    }
                    Some(Err(e)) => {
                        warn!("Adapter task join error: {}", e);
                    }
                }
            }
        }

        // Every configured adapter gets an entry; silence is never agreement.
        for adapter in &self.adapters {
            let id = adapter.id();
            if collected.contains_key(&id) {
                continue;
            }
            let detail = if cancelled {
                "run cancelled before the adapter responded"
            } else {
                "adapter task ended without producing a verdict"
            };
            let outcome = AdapterOutcome::failure(id, TransportReason::Unreachable, detail);
            progress.on_adapter_complete(scenario, id, &outcome);
            collected.insert(id, outcome);
        }

        collected
    }

    async fn evaluate_with_timeout(
        adapter: &dyn ValidatorAdapter,
        scenario: &Scenario,
        timeout: Duration,
    ) -> AdapterOutcome {
        let id = adapter.id();
        match tokio::time::timeout(timeout, adapter.evaluate(scenario)).await {
            Ok(AdapterOutcome::Failure(mut failure)) => {
                failure.adapter_id = id;
                AdapterOutcome::Failure(failure)
            }
            Ok(outcome) => outcome,
            Err(_) => AdapterOutcome::failure(
                id,
                TransportReason::Timeout,
                format!("no verdict within {}ms", timeout.as_millis()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use schedule_domain::{
        DiscrepancyType, ErrorCode, Recommendation, Selection, ValidationResult, find_scenario,
        validate,
    };
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    /// Adapter that answers with a fixed outcome after an optional delay
    struct ScriptedAdapter {
        id: AdapterId,
        outcome: AdapterOutcome,
        delay: Duration,
        seen: Mutex<Vec<Selection>>,
    }

    impl ScriptedAdapter {
        fn new(id: AdapterId, outcome: impl Into<AdapterOutcome>) -> Self {
            Self {
                id,
                outcome: outcome.into(),
                delay: Duration::ZERO,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl ValidatorAdapter for ScriptedAdapter {
        fn id(&self) -> AdapterId {
            self.id
        }

        async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome {
            self.seen.lock().unwrap().push(scenario.selection.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.outcome.clone()
        }
    }

    /// Adapter that runs the reference validator
    struct GoldenLike;

    #[async_trait]
    impl ValidatorAdapter for GoldenLike {
        fn id(&self) -> AdapterId {
            AdapterId::Golden
        }

        async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome {
            validate(&scenario.selection).into()
        }
    }

    /// Adapter whose task panics
    struct PanickingAdapter;

    #[async_trait]
    impl ValidatorAdapter for PanickingAdapter {
        fn id(&self) -> AdapterId {
            AdapterId::Backend
        }

        async fn evaluate(&self, _scenario: &Scenario) -> AdapterOutcome {
            panic!("backend client bug")
        }
    }

    /// Records state transitions
    #[derive(Default)]
    struct RecordingProgress {
        states: Mutex<Vec<RunState>>,
        completed: Mutex<Vec<AdapterId>>,
    }

    impl ConsensusProgressNotifier for RecordingProgress {
        fn on_scenario_start(&self, _scenario: &Scenario, _total_adapters: usize) {}

        fn on_adapter_complete(&self, _scenario: &Scenario, adapter: AdapterId, _outcome: &AdapterOutcome) {
            self.completed.lock().unwrap().push(adapter);
        }

        fn on_scenario_complete(&self, _report: &ConsensusReport) {}

        fn on_state_change(&self, _scenario_id: &str, state: RunState) {
            self.states.lock().unwrap().push(state);
        }
    }

    fn use_case(adapters: Vec<Arc<dyn ValidatorAdapter>>) -> RunConsensusUseCase {
        RunConsensusUseCase::new(
            adapters,
            ConsensusParams::default().with_adapter_timeout(Duration::from_millis(200)),
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_no_adapters_is_an_error() {
        let err = use_case(vec![])
            .execute(find_scenario("mon-sat").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, RunConsensusError::NoAdapters);
    }

    #[tokio::test]
    async fn test_duplicate_adapter_is_an_error() {
        let err = use_case(vec![Arc::new(GoldenLike), Arc::new(GoldenLike)])
            .execute(find_scenario("mon-sat").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err, RunConsensusError::DuplicateAdapter(AdapterId::Golden));
    }

    #[tokio::test]
    async fn test_agreeing_adapters_approve() {
        let backend = Arc::new(ScriptedAdapter::new(AdapterId::Backend, ValidationResult::valid(3)));
        let legacy = Arc::new(ScriptedAdapter::new(AdapterId::Legacy, ValidationResult::valid(3)));
        let uc = use_case(vec![Arc::new(GoldenLike), backend.clone(), legacy.clone()]);

        let scenario = find_scenario("fri-mon-wrap").unwrap();
        let selection = scenario.selection.clone();
        let report = uc.execute(scenario).await.unwrap();

        assert_eq!(report.recommendation, Recommendation::Approve);
        assert_eq!(report.per_adapter.len(), 3);
        // Every adapter saw the same selection
        assert_eq!(*backend.seen.lock().unwrap(), vec![selection.clone()]);
        assert_eq!(*legacy.seen.lock().unwrap(), vec![selection]);
    }

    #[tokio::test]
    async fn test_divergent_backend_escalates() {
        let backend = ScriptedAdapter::new(AdapterId::Backend, ValidationResult::valid(6));
        let uc = use_case(vec![Arc::new(GoldenLike), Arc::new(backend)]);

        let report = uc.execute(find_scenario("full-week").unwrap()).await.unwrap();

        assert_eq!(report.recommendation, Recommendation::Escalate);
        let kinds: Vec<_> = report.discrepancies.iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&DiscrepancyType::NightsMismatch));
        assert!(kinds.contains(&DiscrepancyType::BackendWrong));
    }

    #[tokio::test]
    async fn test_unanimous_rejection() {
        let backend = ScriptedAdapter::new(
            AdapterId::Backend,
            ValidationResult::invalid(ErrorCode::NonContiguous, None, "not consecutive"),
        );
        let uc = use_case(vec![Arc::new(GoldenLike), Arc::new(backend)]);

        let report = uc.execute(find_scenario("mon-wed-fri").unwrap()).await.unwrap();
        assert_eq!(report.recommendation, Recommendation::Reject);
        assert!(report.discrepancies.is_empty());
    }

    #[tokio::test]
    async fn test_slow_adapter_times_out() {
        let slow = ScriptedAdapter::new(AdapterId::Legacy, ValidationResult::valid(5))
            .with_delay(Duration::from_secs(5));
        let uc = use_case(vec![Arc::new(GoldenLike), Arc::new(slow)]);

        let report = uc.execute(find_scenario("mon-sat").unwrap()).await.unwrap();

        let failure = report.per_adapter[&AdapterId::Legacy]
            .transport_failure()
            .cloned()
            .unwrap();
        assert_eq!(failure.reason, TransportReason::Timeout);
        assert_eq!(failure.adapter_id, AdapterId::Legacy);
        assert_eq!(report.recommendation, Recommendation::Escalate);
    }

    #[tokio::test]
    async fn test_panicking_adapter_is_recorded() {
        let uc = use_case(vec![Arc::new(GoldenLike), Arc::new(PanickingAdapter)]);

        let report = uc.execute(find_scenario("mon-sat").unwrap()).await.unwrap();

        let failure = report.per_adapter[&AdapterId::Backend]
            .transport_failure()
            .cloned()
            .unwrap();
        assert_eq!(failure.reason, TransportReason::Unreachable);
        assert_eq!(report.recommendation, Recommendation::Escalate);
    }

    #[tokio::test]
    async fn test_cancellation_keeps_partial_results() {
        let slow = ScriptedAdapter::new(AdapterId::Legacy, ValidationResult::valid(5))
            .with_delay(Duration::from_secs(30));
        let uc = RunConsensusUseCase::new(
            vec![Arc::new(GoldenLike), Arc::new(slow)],
            ConsensusParams::default().with_adapter_timeout(Duration::from_secs(60)),
        );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let report = uc
            .execute_with_progress(find_scenario("mon-sat").unwrap(), &NoProgress, &cancel)
            .await
            .unwrap();

        assert!(report.per_adapter[&AdapterId::Golden].is_verdict());
        let failure = report.per_adapter[&AdapterId::Legacy]
            .transport_failure()
            .cloned()
            .unwrap();
        assert!(failure.detail.contains("cancelled"));
        assert_eq!(report.recommendation, Recommendation::Escalate);
    }

    #[tokio::test]
    async fn test_state_machine_order() {
        let progress = RecordingProgress::default();
        let uc = use_case(vec![Arc::new(GoldenLike)]);

        uc.execute_with_progress(
            find_scenario("mon-tue").unwrap(),
            &progress,
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let states = progress.states.lock().unwrap().clone();
        assert_eq!(
            states,
            vec![
                RunState::Pending,
                RunState::Collecting,
                RunState::Compared,
                RunState::Rejected
            ]
        );
        assert!(states.windows(2).all(|w| w[0].can_transition_to(w[1])));
        assert_eq!(*progress.completed.lock().unwrap(), vec![AdapterId::Golden]);
    }

    #[tokio::test]
    async fn test_failure_is_attributed_to_reporting_adapter() {
        // An adapter that mislabels its own failure still gets its own id
        let confused = ScriptedAdapter::new(
            AdapterId::Legacy,
            AdapterOutcome::failure(AdapterId::Golden, TransportReason::ParseError, "no verdict"),
        );
        let uc = use_case(vec![Arc::new(GoldenLike), Arc::new(confused)]);

        let report = uc.execute(find_scenario("mon-sat").unwrap()).await.unwrap();
        assert!(report.per_adapter[&AdapterId::Golden].is_verdict());
        assert_eq!(
            report.per_adapter[&AdapterId::Legacy]
                .transport_failure()
                .map(|f| f.adapter_id),
            Some(AdapterId::Legacy)
        );
    }
}
