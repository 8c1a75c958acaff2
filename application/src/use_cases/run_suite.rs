//! Run Suite use case
//!
//! Runs a list of scenarios through [`RunConsensusUseCase`], writes a
//! discrepancy document for every scenario that needs investigation, and
//! aggregates the results into a summary.

use super::run_consensus::{RunConsensusError, RunConsensusUseCase};
use crate::ports::progress::{ConsensusProgressNotifier, NoProgress};
use crate::ports::report_sink::DiscrepancySink;
use crate::ports::run_logger::{NoRunLogger, RunLogger};
use futures::StreamExt;
use futures::stream;
use schedule_domain::{
    AdapterId, ConsensusReport, DiscrepancyReporter, Scenario, SuiteSummary,
    render_summary_table,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A discrepancy document that was handed to the sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDocument {
    pub scenario_id: String,
    /// Where the sink stored it
    pub location: String,
}

/// Output of a suite run
#[derive(Debug, Clone)]
pub struct SuiteResult {
    /// Reports in scenario order
    pub reports: Vec<ConsensusReport>,
    pub summary: SuiteSummary,
    /// Markdown summary table
    pub table: String,
    pub documents: Vec<PersistedDocument>,
}

impl SuiteResult {
    /// Whether any scenario ended in ESCALATE
    pub fn has_escalations(&self) -> bool {
        self.summary.escalated > 0
    }
}

/// Use case for running many scenarios
pub struct RunSuiteUseCase {
    consensus: RunConsensusUseCase,
    sink: Option<Arc<dyn DiscrepancySink>>,
    run_logger: Arc<dyn RunLogger>,
}

impl RunSuiteUseCase {
    pub fn new(consensus: RunConsensusUseCase) -> Self {
        Self {
            consensus,
            sink: None,
            run_logger: Arc::new(NoRunLogger),
        }
    }

    /// Persist discrepancy documents through this sink
    pub fn with_sink(mut self, sink: Arc<dyn DiscrepancySink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    pub fn adapter_ids(&self) -> Vec<AdapterId> {
        self.consensus.adapter_ids()
    }

    pub async fn execute(&self, scenarios: Vec<Scenario>) -> Result<SuiteResult, RunConsensusError> {
        self.execute_with_progress(scenarios, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Run every scenario, at most `max_parallel_scenarios` at a time
    ///
    /// Reports keep the input order regardless of completion order.
    pub async fn execute_with_progress(
        &self,
        scenarios: Vec<Scenario>,
        progress: &dyn ConsensusProgressNotifier,
        cancel: &CancellationToken,
    ) -> Result<SuiteResult, RunConsensusError> {
        let parallel = self.consensus.params().max_parallel_scenarios;
        info!(
            "Running {} scenarios ({} at a time)",
            scenarios.len(),
            parallel
        );

        let results: Vec<Result<ConsensusReport, RunConsensusError>> = stream::iter(scenarios)
            .map(|scenario| self.consensus.execute_with_progress(scenario, progress, cancel))
            .buffered(parallel)
            .collect()
            .await;

        let mut reports = Vec::with_capacity(results.len());
        let mut documents = Vec::new();

        for result in results {
            let report = result?;
            self.run_logger.log(&report);
            if let Some(document) = self.persist(&report) {
                documents.push(document);
            }
            reports.push(report);
        }

        let summary = SuiteSummary::from_reports(&reports);
        let table = render_summary_table(&reports, &self.adapter_ids());
        info!(
            "Suite complete: {}/{} passed, {} escalated",
            summary.passed, summary.total, summary.escalated
        );

        Ok(SuiteResult {
            reports,
            summary,
            table,
            documents,
        })
    }

    fn persist(&self, report: &ConsensusReport) -> Option<PersistedDocument> {
        let document = DiscrepancyReporter::report(&report.scenario, report)?;
        let sink = self.sink.as_ref()?;

        match sink.persist(&document) {
            Ok(location) => {
                info!("Discrepancy report for {} written to {}", report.scenario.id, location);
                Some(PersistedDocument {
                    scenario_id: report.scenario.id.clone(),
                    location,
                })
            }
            Err(e) => {
                warn!("Could not persist report for {}: {}", report.scenario.id, e);
                None
            }
        }
    }
}
