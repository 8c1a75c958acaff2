//! Discrepancy documents.
//!
//! Turns an escalated or disagreeing [`ConsensusReport`] into a hand-off
//! artifact for manual investigation, including templated questions. The
//! legacy oracle cannot be inspected as source, so these questions are what
//! an auditor takes to it.

use super::discrepancy::{Discrepancy, DiscrepancyType, Observed};
use super::outcome::{AdapterId, AdapterOutcome, TransportReason};
use super::report::{ConsensusReport, Recommendation};
use super::scenario::Scenario;
use crate::schedule::{Selection, analyze};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Structured hand-off document for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyDocument {
    pub scenario_id: String,
    pub description: String,
    pub selection: Selection,
    pub expected_nights: Option<u32>,
    pub expected_valid: Option<bool>,
    pub recommendation: Recommendation,
    pub captured: BTreeMap<AdapterId, AdapterOutcome>,
    pub discrepancies: Vec<Discrepancy>,
    pub questions: Vec<String>,
}

impl DiscrepancyDocument {
    /// File name used when persisting this document
    ///
    /// Ids that are not already file-safe get a short digest of the raw id
    /// appended, so two ids that slug the same never share a file.
    pub fn file_name(&self) -> String {
        let slug: String = self
            .scenario_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if slug == self.scenario_id {
            return format!("discrepancy-{}.md", slug);
        }
        let digest = format!("{:x}", Sha256::digest(self.scenario_id.as_bytes()));
        format!("discrepancy-{}-{}.md", slug, &digest[..8])
    }

    /// Render as markdown with fixed section order
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("# Discrepancy Report: {}\n\n", self.scenario_id));
        if !self.description.is_empty() {
            out.push_str(&format!("**Scenario:** {}\n\n", self.description));
        }
        out.push_str(&format!(
            "**Selection:** {} `{}`\n\n",
            self.selection,
            self.selection.index_notation()
        ));
        out.push_str(&format!("**Recommendation:** {}\n\n", self.recommendation));

        out.push_str("## Expected Results\n\n");
        out.push_str("| Field | Expected |\n|-------|----------|\n");
        out.push_str(&format!(
            "| Nights | {} |\n",
            optional(self.expected_nights.map(|n| n.to_string()))
        ));
        out.push_str(&format!(
            "| Valid | {} |\n\n",
            optional(self.expected_valid.map(|v| v.to_string()))
        ));

        out.push_str("## Discrepancies Found\n\n");
        if self.discrepancies.is_empty() {
            out.push_str("None between responding adapters.\n\n");
        } else {
            for (i, d) in self.discrepancies.iter().enumerate() {
                out.push_str(&format!("{}. **{}**: {}\n", i + 1, d.kind, d.message));
            }
            out.push('\n');
        }

        out.push_str("## Captured Data\n\n");
        for (adapter, outcome) in &self.captured {
            out.push_str(&format!("### {}\n\n", adapter.label()));
            match outcome {
                AdapterOutcome::Verdict(v) => {
                    out.push_str("- Status: verdict\n");
                    out.push_str(&format!(
                        "- Nights: {}\n",
                        optional(v.nights_count.map(|n| n.to_string()))
                    ));
                    out.push_str(&format!(
                        "- Valid: {}\n",
                        optional(v.is_valid.map(|b| b.to_string()))
                    ));
                    out.push_str(&format!(
                        "- Error code: {}\n",
                        optional(v.error_code.map(|c| c.to_string()))
                    ));
                    out.push_str(&format!(
                        "- Error message: {}\n\n",
                        optional(v.error_message.clone())
                    ));
                }
                AdapterOutcome::Failure(f) => {
                    out.push_str(&format!("- Status: transport failure ({})\n", f.reason));
                    out.push_str(&format!("- Detail: {}\n\n", f.detail));
                }
            }
        }

        out.push_str("## Generated Questions\n\n");
        for (i, q) in self.questions.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, q));
        }

        out
    }
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_else(|| "null".to_string())
}

/// Builds discrepancy documents from consensus reports
pub struct DiscrepancyReporter;

impl DiscrepancyReporter {
    /// Build the document for a report.
    ///
    /// Returns `None` when the report is a clean pass and needs no follow-up.
    pub fn report(scenario: &Scenario, report: &ConsensusReport) -> Option<DiscrepancyDocument> {
        if !report.needs_investigation() {
            return None;
        }

        Some(DiscrepancyDocument {
            scenario_id: scenario.id.clone(),
            description: scenario.description.clone(),
            selection: scenario.selection.clone(),
            expected_nights: scenario.expected_nights,
            expected_valid: scenario.expected_valid,
            recommendation: report.recommendation,
            captured: report.per_adapter.clone(),
            discrepancies: report.discrepancies.clone(),
            questions: Self::questions(scenario, report),
        })
    }

    /// Generate investigation questions from the discrepancy types and the
    /// shape of the selection
    pub fn questions(scenario: &Scenario, report: &ConsensusReport) -> Vec<String> {
        let mut questions = Vec::new();
        let len = scenario.selection.len();
        let analysis = analyze(&scenario.selection);

        for d in &report.discrepancies {
            let question = match d.kind {
                DiscrepancyType::NightsMismatch => {
                    let values = describe_values(d);
                    format!(
                        "For a {}-day selection, {}. Does one implementation count nights as `length` ({}) instead of `length - 1` ({})?",
                        len,
                        values,
                        len,
                        len.saturating_sub(1)
                    )
                }
                DiscrepancyType::ValidityMismatch => format!(
                    "{}. Do these implementations apply the same minimum-night threshold and the same contiguity rule?",
                    describe_values(d)
                ),
                kind => {
                    let adapter = kind
                        .blamed_adapter()
                        .map(|a| a.label())
                        .unwrap_or("An adapter");
                    match d.expected {
                        Some(Observed::Nights(_)) => format!(
                            "{} reports {} where {} was expected for {}. Which step of its night calculation differs?",
                            adapter,
                            first_value(d),
                            d.expected.map(|e| e.to_string()).unwrap_or_default(),
                            scenario.selection
                        ),
                        _ => format!(
                            "{} judges {} as {} where {} was expected. Which validation rule does it apply differently?",
                            adapter,
                            scenario.selection,
                            first_value(d),
                            d.expected.map(|e| e.to_string()).unwrap_or_default()
                        ),
                    }
                }
            };
            push_unique(&mut questions, question);
        }

        let disagreeing = report.needs_investigation();
        if disagreeing && analysis.is_full_week {
            push_unique(
                &mut questions,
                "Does each implementation special-case a 7-day selection as 7 nights (full-time), rather than applying `length - 1` = 6?".to_string(),
            );
        }
        if disagreeing && !scenario.selection.is_empty() && !analysis.is_contiguous {
            push_unique(
                &mut questions,
                format!(
                    "{} is not one arc. Does each implementation check contiguity modulo 7 (wraparound), and refuse to report a night count for a gapped selection?",
                    scenario.selection.index_notation()
                ),
            );
        }
        if disagreeing && analysis.wraps_around() {
            push_unique(
                &mut questions,
                format!(
                    "{} crosses the Saturday→Sunday boundary. Does each implementation treat the week as circular, or does it use a plain min..max range check?",
                    scenario.selection.index_notation()
                ),
            );
        }

        for failure in report.unreachable() {
            let question = match failure.reason {
                TransportReason::AuthRequired => format!(
                    "{} hit an authentication wall ({}). Which credentials or session setup are needed to reach its verdict?",
                    failure.adapter_id.label(),
                    failure.detail
                ),
                TransportReason::ParseError => format!(
                    "{} rendered output with no recognizable verdict ({}). Has its page or response format changed?",
                    failure.adapter_id.label(),
                    failure.detail
                ),
                TransportReason::Timeout | TransportReason::Unreachable => format!(
                    "{} produced no verdict ({}: {}). Should this scenario be re-run once it is reachable?",
                    failure.adapter_id.label(),
                    failure.reason,
                    failure.detail
                ),
            };
            push_unique(&mut questions, question);
        }

        questions
    }
}

fn describe_values(d: &Discrepancy) -> String {
    d.values
        .iter()
        .map(|(adapter, value)| format!("{} reports {}", adapter.label(), value))
        .collect::<Vec<_>>()
        .join(" while ")
}

fn first_value(d: &Discrepancy) -> String {
    d.values
        .values()
        .next()
        .map(|v| v.to_string())
        .unwrap_or_default()
}

fn push_unique(questions: &mut Vec<String>, question: String) {
    if !questions.contains(&question) {
        questions.push(question);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::engine::ConsensusEngine;
    use crate::schedule::{ErrorCode, ValidationResult};

    fn run(scenario: Scenario, entries: Vec<(AdapterId, AdapterOutcome)>) -> ConsensusReport {
        ConsensusEngine::compare(scenario, entries.into_iter().collect())
    }

    #[test]
    fn test_clean_pass_has_no_document() {
        let scenario = Scenario::new("ok", Selection::from_indices(&[1, 2, 3]).unwrap()).expect_valid(2);
        let report = run(
            scenario.clone(),
            vec![
                (AdapterId::Golden, ValidationResult::valid(2).into()),
                (AdapterId::Backend, ValidationResult::valid(2).into()),
            ],
        );
        assert!(DiscrepancyReporter::report(&scenario, &report).is_none());
    }

    #[test]
    fn test_full_week_nights_mismatch_questions() {
        let scenario = Scenario::new("full-week", Selection::full_week()).expect_valid(7);
        let report = run(
            scenario.clone(),
            vec![
                (AdapterId::Golden, ValidationResult::valid(7).into()),
                (AdapterId::Legacy, ValidationResult::valid(6).into()),
            ],
        );

        let doc = DiscrepancyReporter::report(&scenario, &report).unwrap();
        assert!(doc.questions.iter().any(|q| q.contains("`length - 1`")));
        assert!(doc.questions.iter().any(|q| q.contains("7-day selection")));
        assert!(doc.questions.iter().any(|q| q.starts_with("Legacy reports 6 nights")));
    }

    #[test]
    fn test_non_contiguous_question_mentions_wraparound() {
        let scenario =
            Scenario::new("gap", Selection::from_indices(&[1, 3, 5]).unwrap()).expect_invalid(None);
        let report = run(
            scenario.clone(),
            vec![
                (
                    AdapterId::Golden,
                    ValidationResult::invalid(ErrorCode::NonContiguous, None, "gap").into(),
                ),
                (AdapterId::Backend, ValidationResult::valid(2).into()),
            ],
        );

        let doc = DiscrepancyReporter::report(&scenario, &report).unwrap();
        assert!(doc.questions.iter().any(|q| q.contains("modulo 7")));
        assert!(doc.questions.iter().any(|q| q.contains("minimum-night threshold")));
    }

    #[test]
    fn test_auth_failure_question() {
        let scenario = Scenario::new("wrap", Selection::from_indices(&[5, 6, 0, 1]).unwrap());
        let report = run(
            scenario.clone(),
            vec![
                (AdapterId::Golden, ValidationResult::valid(3).into()),
                (
                    AdapterId::Legacy,
                    AdapterOutcome::failure(AdapterId::Legacy, TransportReason::AuthRequired, "login form shown"),
                ),
            ],
        );

        let doc = DiscrepancyReporter::report(&scenario, &report).unwrap();
        assert!(doc.discrepancies.is_empty());
        assert_eq!(doc.recommendation, Recommendation::Escalate);
        assert!(doc.questions.iter().any(|q| q.contains("authentication wall")));
        assert!(doc.questions.iter().any(|q| q.contains("Saturday→Sunday")));
    }

    #[test]
    fn test_markdown_sections_in_order() {
        let scenario = Scenario::new("fri-mon-wrap", Selection::from_indices(&[5, 6, 0, 1]).unwrap())
            .expect_valid(3)
            .with_description("Friday through Monday");
        let report = run(
            scenario.clone(),
            vec![
                (AdapterId::Golden, ValidationResult::valid(3).into()),
                (AdapterId::Backend, ValidationResult::valid(4).into()),
                (
                    AdapterId::Legacy,
                    AdapterOutcome::failure(AdapterId::Legacy, TransportReason::Timeout, "30s"),
                ),
            ],
        );

        let markdown = DiscrepancyReporter::report(&scenario, &report)
            .unwrap()
            .to_markdown();

        let sections = [
            "# Discrepancy Report: fri-mon-wrap",
            "## Expected Results",
            "## Discrepancies Found",
            "## Captured Data",
            "## Generated Questions",
        ];
        let positions: Vec<usize> = sections
            .iter()
            .map(|s| markdown.find(s).expect(s))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(markdown.contains("**Selection:** Sun, Mon, Fri, Sat `{0,1,5,6}`"));
        assert!(markdown.contains("**NIGHTS_MISMATCH**"));
        assert!(markdown.contains("**BACKEND_WRONG**"));
        assert!(markdown.contains("- Status: transport failure (TIMEOUT)"));
    }

    #[test]
    fn test_markdown_is_deterministic() {
        let scenario = Scenario::new("full-week", Selection::full_week()).expect_valid(7);
        let report = run(
            scenario.clone(),
            vec![
                (AdapterId::Legacy, ValidationResult::valid(6).into()),
                (AdapterId::Golden, ValidationResult::valid(7).into()),
            ],
        );
        let a = DiscrepancyReporter::report(&scenario, &report).unwrap().to_markdown();
        let b = DiscrepancyReporter::report(&scenario, &report).unwrap().to_markdown();
        assert_eq!(a, b);
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let scenario = Scenario::new("adhoc 1/2", Selection::full_week());
        let report = run(scenario.clone(), vec![]);
        let doc = DiscrepancyReporter::report(&scenario, &report).unwrap();
        let name = doc.file_name();
        assert!(name.starts_with("discrepancy-adhoc_1_2-"), "{}", name);
        assert!(name.ends_with(".md"));
        assert_eq!(name.len(), "discrepancy-adhoc_1_2-".len() + 8 + ".md".len());
    }

    #[test]
    fn test_file_names_of_colliding_slugs_differ() {
        let names: Vec<String> = ["adhoc 1/2", "adhoc_1_2", "adhoc:1:2"]
            .into_iter()
            .map(|id| {
                let scenario = Scenario::new(id, Selection::full_week());
                let report = run(scenario.clone(), vec![]);
                DiscrepancyReporter::report(&scenario, &report)
                    .unwrap()
                    .file_name()
            })
            .collect();

        assert_eq!(names[1], "discrepancy-adhoc_1_2.md");
        assert_ne!(names[0], names[1]);
        assert_ne!(names[0], names[2]);
        assert_ne!(names[1], names[2]);
    }
}
