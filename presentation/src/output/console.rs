//! Console output formatter for consensus results

use crate::output::formatter::ReportFormatter;
use colored::{ColoredString, Colorize};
use schedule_application::SuiteResult;
use schedule_domain::{
    AdapterOutcome, ConsensusReport, DiscrepancyReporter, OutputFormat, Recommendation, Scenario,
    SuiteSummary, ValidationResult,
};

/// Formats consensus results for console display
pub struct ConsoleFormatter {
    format: OutputFormat,
}

impl ConsoleFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Format one report as a colored per-adapter breakdown
    pub fn format_full(report: &ConsensusReport) -> String {
        let mut output = String::new();
        let scenario = &report.scenario;

        // Header
        output.push_str(&Self::header(&format!("Scenario: {}", scenario.id)));
        output.push('\n');

        if !scenario.description.is_empty() {
            output.push_str(&format!("{}\n", scenario.description.dimmed()));
        }
        output.push_str(&format!(
            "{} {} {}\n",
            "Selection:".cyan().bold(),
            scenario.selection,
            scenario.selection.index_notation().dimmed()
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Expected:".cyan().bold(),
            Self::expectation(scenario)
        ));

        // Per-adapter outcomes
        output.push_str(&Self::section_header("Adapters"));
        for (adapter, outcome) in &report.per_adapter {
            let line = match outcome {
                AdapterOutcome::Verdict(v) => Self::verdict_line(v),
                AdapterOutcome::Failure(f) => {
                    format!("{} {}", f.reason.to_string().red().bold(), f.detail)
                }
            };
            output.push_str(&format!("  {:<8} {}\n", adapter.label().bold(), line));
        }

        // Discrepancies (if any)
        if !report.discrepancies.is_empty() {
            output.push_str(&Self::section_header("Discrepancies"));
            for discrepancy in &report.discrepancies {
                output.push_str(&format!(
                    "  {} {}\n",
                    discrepancy.kind.to_string().yellow().bold(),
                    discrepancy.message
                ));
            }
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Recommendation:".bold(),
            Self::recommendation(report.recommendation)
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(report: &ConsensusReport) -> String {
        report.to_json()
    }

    /// Format as markdown: the discrepancy document, or a one-line pass
    pub fn format_markdown(report: &ConsensusReport) -> String {
        match DiscrepancyReporter::report(&report.scenario, report) {
            Some(document) => document.to_markdown(),
            None => format!(
                "# {}: {}\n\nAll adapters agree. No discrepancies.\n",
                report.scenario.id, report.recommendation
            ),
        }
    }

    /// Format a suite run in the configured format
    pub fn format_suite_result(&self, result: &SuiteResult) -> String {
        match self.format {
            OutputFormat::Json => {
                let reports: Vec<serde_json::Value> = result
                    .reports
                    .iter()
                    .filter_map(|r| serde_json::to_value(r).ok())
                    .collect();
                let value = serde_json::json!({
                    "summary": result.summary,
                    "reports": reports,
                    "documents": result
                        .documents
                        .iter()
                        .map(|d| serde_json::json!({"scenarioId": d.scenario_id, "location": d.location}))
                        .collect::<Vec<_>>(),
                });
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Markdown => {
                let mut output = String::from("# Schedule Consensus Summary\n\n");
                output.push_str(&result.table);
                output.push('\n');
                output.push_str(&Self::summary_sentence(&result.summary));
                output.push('\n');
                output
            }
            OutputFormat::Full => {
                let mut output = Self::header("Suite Results");
                output.push_str("\n\n");
                output.push_str(&result.table);
                output.push('\n');
                output.push_str(&Self::summary_line(&result.summary));
                if !result.documents.is_empty() {
                    output.push_str(&Self::section_header("Discrepancy Reports"));
                    for document in &result.documents {
                        output.push_str(&format!(
                            "  {} {}\n",
                            document.scenario_id.yellow(),
                            document.location
                        ));
                    }
                }
                output.push_str(&Self::footer());
                output
            }
        }
    }

    /// Format the fixture catalog
    pub fn format_scenario_list(scenarios: &[Scenario]) -> String {
        let width = scenarios.iter().map(|s| s.id.len()).max().unwrap_or(0);
        let mut output = format!("{}\n", "Fixture scenarios:".cyan().bold());
        for scenario in scenarios {
            output.push_str(&format!(
                "  {:<width$}  {:<18} {:<24} {}\n",
                scenario.id,
                scenario.selection.index_notation(),
                Self::expectation(scenario),
                scenario.description.dimmed(),
                width = width
            ));
        }
        output
    }

    fn verdict_line(v: &ValidationResult) -> String {
        let nights = v
            .nights_count
            .map(|n| format!("{} nights", n))
            .unwrap_or_else(|| "nights: null".to_string());
        match v.is_valid {
            Some(true) => format!("{} {}", "valid".green().bold(), nights),
            Some(false) => {
                let code = v.error_code.map(|c| c.to_string()).unwrap_or_default();
                let message = v.error_message.as_deref().unwrap_or("");
                format!(
                    "{} {} {} {}",
                    "invalid".red().bold(),
                    nights,
                    code.yellow(),
                    message.dimmed()
                )
                .trim_end()
                .to_string()
            }
            None => format!("{} {}", "no validity".yellow(), nights),
        }
    }

    fn expectation(scenario: &Scenario) -> String {
        let validity = match scenario.expected_valid {
            Some(true) => "valid",
            Some(false) => "invalid",
            None => "unspecified",
        };
        match scenario.expected_nights {
            Some(n) => format!("{}, {} nights", validity, n),
            None if scenario.expected_valid == Some(false) => format!("{}, nights null", validity),
            None => validity.to_string(),
        }
    }

    fn recommendation(rec: Recommendation) -> ColoredString {
        match rec {
            Recommendation::Approve => rec.as_str().green().bold(),
            Recommendation::Reject => rec.as_str().blue().bold(),
            Recommendation::Escalate => rec.as_str().red().bold(),
        }
    }

    fn summary_line(summary: &SuiteSummary) -> String {
        let passed = format!("{}/{} passed", summary.passed, summary.total);
        let passed = if summary.all_passed() {
            passed.green().bold()
        } else {
            passed.red().bold()
        };
        format!(
            "{}  ({} approved, {} rejected, {} escalated)\n",
            passed, summary.approved, summary.rejected, summary.escalated
        )
    }

    fn summary_sentence(summary: &SuiteSummary) -> String {
        format!(
            "**{}/{} passed**: {} approved, {} rejected, {} escalated.\n",
            summary.passed, summary.total, summary.approved, summary.rejected, summary.escalated
        )
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ConsensusReport) -> String {
        match self.format {
            OutputFormat::Full => Self::format_full(report),
            OutputFormat::Json => Self::format_json(report),
            OutputFormat::Markdown => Self::format_markdown(report),
        }
    }

    fn format_suite(&self, result: &SuiteResult) -> String {
        self.format_suite_result(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedule_application::PersistedDocument;
    use schedule_domain::{
        AdapterId, ConsensusEngine, TransportReason, find_scenario, render_summary_table,
        standard_scenarios, validate,
    };

    fn no_color() {
        colored::control::set_override(false);
    }

    fn escalated() -> ConsensusReport {
        ConsensusEngine::compare(
            find_scenario("full-week").unwrap(),
            [
                (AdapterId::Golden, ValidationResult::valid(7).into()),
                (AdapterId::Backend, ValidationResult::valid(6).into()),
                (
                    AdapterId::Legacy,
                    AdapterOutcome::failure(AdapterId::Legacy, TransportReason::AuthRequired, "login wall"),
                ),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn approved() -> ConsensusReport {
        ConsensusEngine::compare(
            find_scenario("mon-sat").unwrap(),
            [(AdapterId::Golden, ValidationResult::valid(5).into())]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn test_full_format_lists_adapters_and_discrepancies() {
        no_color();
        let text = ConsoleFormatter::format_full(&escalated());
        assert!(text.contains("Scenario: full-week"));
        assert!(text.contains("valid 7 nights"));
        assert!(text.contains("valid 6 nights"));
        assert!(text.contains("AUTH_REQUIRED login wall"));
        assert!(text.contains("NIGHTS_MISMATCH"));
        assert!(text.contains("Recommendation: ESCALATE"));
    }

    #[test]
    fn test_full_format_invalid_verdict() {
        no_color();
        let report = ConsensusEngine::compare(
            find_scenario("mon-wed-fri").unwrap(),
            [(AdapterId::Golden, validate(&find_scenario("mon-wed-fri").unwrap().selection).into())]
                .into_iter()
                .collect(),
        );
        let text = ConsoleFormatter::format_full(&report);
        assert!(text.contains("invalid nights: null NON_CONTIGUOUS"));
        assert!(text.contains("Expected: invalid, nights null"));
        assert!(text.contains("Recommendation: REJECT"));
    }

    #[test]
    fn test_json_format_round_trips() {
        let report = escalated();
        let json = ConsoleFormatter::new(OutputFormat::Json).format_report(&report);
        let parsed: ConsensusReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_markdown_format() {
        let formatter = ConsoleFormatter::new(OutputFormat::Markdown);
        assert!(
            formatter
                .format_report(&escalated())
                .starts_with("# Discrepancy Report: full-week")
        );
        assert_eq!(
            formatter.format_report(&approved()),
            "# mon-sat: APPROVE\n\nAll adapters agree. No discrepancies.\n"
        );
    }

    #[test]
    fn test_suite_formats() {
        no_color();
        let reports = vec![approved(), escalated()];
        let adapters = [AdapterId::Golden, AdapterId::Backend, AdapterId::Legacy];
        let result = SuiteResult {
            summary: SuiteSummary::from_reports(&reports),
            table: render_summary_table(&reports, &adapters),
            documents: vec![PersistedDocument {
                scenario_id: "full-week".to_string(),
                location: "discrepancies/discrepancy-full-week.md".to_string(),
            }],
            reports,
        };

        let full = ConsoleFormatter::new(OutputFormat::Full).format_suite(&result);
        assert!(full.contains("1/2 passed"));
        assert!(full.contains("discrepancies/discrepancy-full-week.md"));

        let markdown = ConsoleFormatter::new(OutputFormat::Markdown).format_suite(&result);
        assert!(markdown.starts_with("# Schedule Consensus Summary"));
        assert!(markdown.contains("| Scenario | Golden | Backend | Legacy | Expected | Result |"));
        assert!(markdown.contains("**1/2 passed**"));

        let json = ConsoleFormatter::new(OutputFormat::Json).format_suite(&result);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["summary"]["escalated"], 1);
        assert_eq!(value["reports"].as_array().unwrap().len(), 2);
        assert_eq!(value["documents"][0]["scenarioId"], "full-week");
    }

    #[test]
    fn test_scenario_list() {
        no_color();
        let text = ConsoleFormatter::format_scenario_list(&standard_scenarios());
        assert!(text.contains("fri-mon-wrap"));
        assert!(text.contains("{0,1,5,6}"));
        assert!(text.contains("valid, 3 nights"));
    }
}
