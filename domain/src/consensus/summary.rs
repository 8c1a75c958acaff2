//! Aggregate summary across a suite of scenario runs

use super::outcome::{AdapterId, AdapterOutcome};
use super::report::{ConsensusReport, Recommendation};
use serde::{Deserialize, Serialize};

/// Counts for a suite run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub passed: usize,
    pub approved: usize,
    pub rejected: usize,
    pub escalated: usize,
}

impl SuiteSummary {
    pub fn from_reports(reports: &[ConsensusReport]) -> Self {
        let mut summary = Self {
            total: reports.len(),
            ..Self::default()
        };
        for report in reports {
            if report.passed() {
                summary.passed += 1;
            }
            match report.recommendation {
                Recommendation::Approve => summary.approved += 1,
                Recommendation::Reject => summary.rejected += 1,
                Recommendation::Escalate => summary.escalated += 1,
            }
        }
        summary
    }

    /// Whether every scenario passed cleanly
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Render the suite as a markdown table: one row per scenario, one column
/// per adapter's night count, the expected count, and a pass/fail glyph.
pub fn render_summary_table(reports: &[ConsensusReport], adapters: &[AdapterId]) -> String {
    let mut out = String::new();

    out.push_str("| Scenario |");
    for adapter in adapters {
        out.push_str(&format!(" {} |", adapter.label()));
    }
    out.push_str(" Expected | Result |\n");

    out.push_str("|----------|");
    for _ in adapters {
        out.push_str("------|");
    }
    out.push_str("----------|--------|\n");

    for report in reports {
        out.push_str(&format!("| {} |", report.scenario.id));
        for adapter in adapters {
            out.push_str(&format!(" {} |", cell(report.per_adapter.get(adapter))));
        }
        let expected = report
            .scenario
            .expected_nights
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string());
        let glyph = if report.passed() { "✅" } else { "❌" };
        out.push_str(&format!(" {} | {} |\n", expected, glyph));
    }

    out
}

fn cell(outcome: Option<&AdapterOutcome>) -> String {
    match outcome {
        None => "-".to_string(),
        Some(AdapterOutcome::Verdict(v)) => v
            .nights_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "null".to_string()),
        Some(AdapterOutcome::Failure(f)) => f.reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::engine::ConsensusEngine;
    use crate::consensus::outcome::TransportReason;
    use crate::consensus::scenario::Scenario;
    use crate::schedule::{ErrorCode, Selection, ValidationResult};

    fn reports() -> Vec<ConsensusReport> {
        vec![
            ConsensusEngine::compare(
                Scenario::new("mon-sat", Selection::from_indices(&[1, 2, 3, 4, 5, 6]).unwrap())
                    .expect_valid(5),
                [
                    (AdapterId::Golden, ValidationResult::valid(5).into()),
                    (AdapterId::Backend, ValidationResult::valid(5).into()),
                ]
                .into_iter()
                .collect(),
            ),
            ConsensusEngine::compare(
                Scenario::new("mon-wed-fri", Selection::from_indices(&[1, 3, 5]).unwrap())
                    .expect_invalid(None),
                [
                    (
                        AdapterId::Golden,
                        ValidationResult::invalid(ErrorCode::NonContiguous, None, "gap").into(),
                    ),
                    (
                        AdapterId::Backend,
                        AdapterOutcome::failure(AdapterId::Backend, TransportReason::Unreachable, "refused"),
                    ),
                ]
                .into_iter()
                .collect(),
            ),
        ]
    }

    #[test]
    fn test_summary_counts() {
        let summary = SuiteSummary::from_reports(&reports());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.approved, 1);
        assert_eq!(summary.escalated, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_table_rows() {
        let table = render_summary_table(
            &reports(),
            &[AdapterId::Golden, AdapterId::Backend, AdapterId::Legacy],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Scenario | Golden | Backend | Legacy | Expected | Result |");
        assert_eq!(lines[2], "| mon-sat | 5 | 5 | - | 5 | ✅ |");
        assert_eq!(lines[3], "| mon-wed-fri | null | UNREACHABLE | - | null | ❌ |");
    }
}
