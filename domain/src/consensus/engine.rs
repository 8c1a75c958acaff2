//! Consensus comparison.
//!
//! Pure classification of already-collected adapter outcomes. Collecting the
//! outcomes (concurrency, timeouts, cancellation) is the application layer's
//! job; this module only decides what the outcomes mean.
//!
//! # Rules
//!
//! | Condition | Recommendation |
//! |-----------|----------------|
//! | Any adapter unreachable, or none responded | ESCALATE |
//! | Any validity mismatch or `<ADAPTER>_WRONG` | ESCALATE |
//! | All valid, identical nights | APPROVE |
//! | All invalid | REJECT |
//! | Anything else | ESCALATE |
//!
//! There is no majority vote: two adapters agreeing against a third still
//! escalates.

use super::discrepancy::{Discrepancy, DiscrepancyType, Observed};
use super::outcome::{AdapterId, AdapterOutcome};
use super::report::{ConsensusReport, Recommendation, RunState};
use super::scenario::Scenario;
use crate::schedule::ValidationResult;
use std::collections::BTreeMap;

/// Classifies adapter agreement for one scenario
pub struct ConsensusEngine;

impl ConsensusEngine {
    /// Compare collected outcomes and build the report
    pub fn compare(
        scenario: Scenario,
        per_adapter: BTreeMap<AdapterId, AdapterOutcome>,
    ) -> ConsensusReport {
        let responding: Vec<(AdapterId, &ValidationResult)> = per_adapter
            .iter()
            .filter_map(|(id, outcome)| outcome.verdict().map(|v| (*id, v)))
            .collect();
        let any_unreachable = responding.len() < per_adapter.len();

        let mut discrepancies = Self::pairwise(&responding);
        discrepancies.extend(Self::against_expectation(&scenario, &responding));

        let recommendation = Self::recommend(&responding, any_unreachable, &discrepancies);

        ConsensusReport {
            scenario,
            per_adapter,
            discrepancies,
            recommendation,
            state: RunState::terminal(recommendation),
        }
    }

    /// Compare every pair of responding adapters
    fn pairwise(responding: &[(AdapterId, &ValidationResult)]) -> Vec<Discrepancy> {
        let mut discrepancies = Vec::new();

        for (i, (a, a_result)) in responding.iter().enumerate() {
            for (b, b_result) in &responding[i + 1..] {
                if a_result.nights_count != b_result.nights_count {
                    discrepancies.push(Discrepancy::between(
                        DiscrepancyType::NightsMismatch,
                        (*a, Observed::Nights(a_result.nights_count)),
                        (*b, Observed::Nights(b_result.nights_count)),
                    ));
                }
                if a_result.is_valid != b_result.is_valid {
                    discrepancies.push(Discrepancy::between(
                        DiscrepancyType::ValidityMismatch,
                        (*a, Observed::Validity(a_result.is_valid)),
                        (*b, Observed::Validity(b_result.is_valid)),
                    ));
                }
            }
        }

        discrepancies
    }

    /// Compare each responding adapter with the scenario's known expectations
    fn against_expectation(
        scenario: &Scenario,
        responding: &[(AdapterId, &ValidationResult)],
    ) -> Vec<Discrepancy> {
        let mut discrepancies = Vec::new();

        for (adapter, result) in responding {
            if let Some(expected) = scenario.expected_valid
                && result.is_valid != Some(expected)
            {
                discrepancies.push(Discrepancy::against_expected(
                    *adapter,
                    Observed::Validity(result.is_valid),
                    Observed::Validity(Some(expected)),
                ));
            }
            if let Some(expected) = scenario.expected_nights
                && result.nights_count != Some(expected)
            {
                discrepancies.push(Discrepancy::against_expected(
                    *adapter,
                    Observed::Nights(result.nights_count),
                    Observed::Nights(Some(expected)),
                ));
            }
        }

        discrepancies
    }

    fn recommend(
        responding: &[(AdapterId, &ValidationResult)],
        any_unreachable: bool,
        discrepancies: &[Discrepancy],
    ) -> Recommendation {
        if responding.is_empty() || any_unreachable {
            return Recommendation::Escalate;
        }

        // Nights disagreements among invalid verdicts are informational and
        // stay in the report, but only validity and expectation misses block
        // a unanimous REJECT.
        let blocking = discrepancies
            .iter()
            .any(|d| d.kind != DiscrepancyType::NightsMismatch);
        if blocking {
            return Recommendation::Escalate;
        }

        if responding.iter().all(|(_, r)| r.is_valid == Some(true)) {
            let has_nights_mismatch = discrepancies
                .iter()
                .any(|d| d.kind == DiscrepancyType::NightsMismatch);
            if has_nights_mismatch {
                Recommendation::Escalate
            } else {
                Recommendation::Approve
            }
        } else if responding.iter().all(|(_, r)| r.is_valid == Some(false)) {
            Recommendation::Reject
        } else {
            Recommendation::Escalate
        }
    }
}
