//! Consensus report types

use super::discrepancy::Discrepancy;
use super::outcome::{AdapterId, AdapterOutcome, TransportFailure};
use super::scenario::Scenario;
use crate::schedule::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final verdict of a consensus run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    /// Unanimous: valid, same night count, matches expectation
    Approve,
    /// Unanimous: invalid
    Reject,
    /// Anything else; needs a human
    Escalate,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE",
            Recommendation::Reject => "REJECT",
            Recommendation::Escalate => "ESCALATE",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of one scenario run
///
/// ```text
/// Pending → Collecting → Compared → { Approved | Rejected | Escalated }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    Pending,
    Collecting,
    Compared,
    Approved,
    Rejected,
    Escalated,
}

impl RunState {
    /// Terminal state for a recommendation
    pub fn terminal(recommendation: Recommendation) -> Self {
        match recommendation {
            Recommendation::Approve => RunState::Approved,
            Recommendation::Reject => RunState::Rejected,
            Recommendation::Escalate => RunState::Escalated,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Approved | RunState::Rejected | RunState::Escalated
        )
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: RunState) -> bool {
        matches!(
            (self, next),
            (RunState::Pending, RunState::Collecting)
                | (RunState::Collecting, RunState::Compared)
                | (
                    RunState::Compared,
                    RunState::Approved | RunState::Rejected | RunState::Escalated
                )
        )
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RunState::Pending => "PENDING",
            RunState::Collecting => "COLLECTING",
            RunState::Compared => "COMPARED",
            RunState::Approved => "APPROVED",
            RunState::Rejected => "REJECTED",
            RunState::Escalated => "ESCALATED",
        };
        write!(f, "{}", s)
    }
}

/// Result of running one scenario through every adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusReport {
    pub scenario: Scenario,
    pub per_adapter: BTreeMap<AdapterId, AdapterOutcome>,
    pub discrepancies: Vec<Discrepancy>,
    pub recommendation: Recommendation,
    pub state: RunState,
}

impl ConsensusReport {
    /// Adapters that produced a verdict
    pub fn responding(&self) -> impl Iterator<Item = (AdapterId, &ValidationResult)> {
        self.per_adapter
            .iter()
            .filter_map(|(id, outcome)| outcome.verdict().map(|v| (*id, v)))
    }

    /// Adapters that failed to produce a verdict
    pub fn unreachable(&self) -> impl Iterator<Item = &TransportFailure> {
        self.per_adapter
            .values()
            .filter_map(AdapterOutcome::transport_failure)
    }

    pub fn has_discrepancies(&self) -> bool {
        !self.discrepancies.is_empty()
    }

    /// Whether this run needs a discrepancy document
    pub fn needs_investigation(&self) -> bool {
        self.has_discrepancies() || self.recommendation == Recommendation::Escalate
    }

    /// Clean pass: no discrepancies and a unanimous verdict
    pub fn passed(&self) -> bool {
        !self.needs_investigation()
    }

    /// Night count reported by one adapter, if it responded
    pub fn nights_for(&self, adapter: AdapterId) -> Option<u32> {
        self.per_adapter
            .get(&adapter)
            .and_then(AdapterOutcome::verdict)
            .and_then(|v| v.nights_count)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
