//! Progress reporting for consensus runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use schedule_application::ConsensusProgressNotifier;
use schedule_domain::{AdapterId, AdapterOutcome, ConsensusReport, Recommendation, Scenario};
use std::collections::HashMap;
use std::sync::Mutex;

/// Reports progress with one bar per in-flight scenario
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn scenario_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("=>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    fn outcome_mark(adapter: AdapterId, outcome: &AdapterOutcome) -> String {
        match outcome {
            AdapterOutcome::Verdict(_) => format!("{} {}", "v".green(), adapter.label()),
            AdapterOutcome::Failure(f) => format!("{} {} ({})", "x".red(), adapter.label(), f.reason),
        }
    }

    fn recommendation_text(rec: Recommendation) -> String {
        match rec {
            Recommendation::Approve => rec.as_str().green().to_string(),
            Recommendation::Reject => rec.as_str().blue().to_string(),
            Recommendation::Escalate => rec.as_str().red().to_string(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsensusProgressNotifier for ProgressReporter {
    fn on_scenario_start(&self, scenario: &Scenario, total_adapters: usize) {
        let pb = self.multi.add(ProgressBar::new(total_adapters as u64));
        pb.set_style(Self::scenario_style());
        pb.set_prefix(scenario.id.clone());
        pb.set_message("collecting...");

        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(scenario.id.clone(), pb);
        }
    }

    fn on_adapter_complete(&self, scenario: &Scenario, adapter: AdapterId, outcome: &AdapterOutcome) {
        if let Ok(bars) = self.bars.lock()
            && let Some(pb) = bars.get(&scenario.id)
        {
            pb.set_message(Self::outcome_mark(adapter, outcome));
            pb.inc(1);
        }
    }

    fn on_scenario_complete(&self, report: &ConsensusReport) {
        if let Ok(mut bars) = self.bars.lock()
            && let Some(pb) = bars.remove(&report.scenario.id)
        {
            pb.finish_with_message(Self::recommendation_text(report.recommendation));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ConsensusProgressNotifier for SimpleProgress {
    fn on_scenario_start(&self, scenario: &Scenario, total_adapters: usize) {
        eprintln!(
            "{} {} ({} adapters)",
            "->".cyan(),
            scenario.id.bold(),
            total_adapters
        );
    }

    fn on_adapter_complete(&self, _scenario: &Scenario, adapter: AdapterId, outcome: &AdapterOutcome) {
        eprintln!("  {}", ProgressReporter::outcome_mark(adapter, outcome));
    }

    fn on_scenario_complete(&self, report: &ConsensusReport) {
        eprintln!(
            "  {} {}",
            "=>".cyan(),
            ProgressReporter::recommendation_text(report.recommendation)
        );
    }
}
