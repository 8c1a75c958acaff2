//! Adapter outcome types
//!
//! Every validator source answers with an [`AdapterOutcome`]: either a
//! business verdict or a transport failure. A transport failure is never
//! treated as a verdict.

use crate::core::error::DomainError;
use crate::schedule::ValidationResult;
use serde::{Deserialize, Serialize};

/// Identity of a validator source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterId {
    /// In-process reference implementation
    Golden,
    /// Independently deployed backend workflow
    Backend,
    /// Legacy production UI, driven through a browser
    Legacy,
}

impl AdapterId {
    pub const ALL: [AdapterId; 3] = [AdapterId::Golden, AdapterId::Backend, AdapterId::Legacy];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdapterId::Golden => "golden",
            AdapterId::Backend => "backend",
            AdapterId::Legacy => "legacy",
        }
    }

    /// Human-facing label for tables and reports
    pub fn label(&self) -> &'static str {
        match self {
            AdapterId::Golden => "Golden",
            AdapterId::Backend => "Backend",
            AdapterId::Legacy => "Legacy",
        }
    }
}

impl std::fmt::Display for AdapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AdapterId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "golden" => Ok(AdapterId::Golden),
            "backend" => Ok(AdapterId::Backend),
            "legacy" | "oracle" => Ok(AdapterId::Legacy),
            other => Err(DomainError::UnknownAdapter(other.to_string())),
        }
    }
}

/// Why an adapter could not produce a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportReason {
    AuthRequired,
    Timeout,
    Unreachable,
    ParseError,
}

impl TransportReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportReason::AuthRequired => "AUTH_REQUIRED",
            TransportReason::Timeout => "TIMEOUT",
            TransportReason::Unreachable => "UNREACHABLE",
            TransportReason::ParseError => "PARSE_ERROR",
        }
    }
}

impl std::fmt::Display for TransportReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An adapter failed before producing a verdict
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportFailure {
    pub adapter_id: AdapterId,
    pub reason: TransportReason,
    pub detail: String,
}

/// What one adapter returned for one scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdapterOutcome {
    Verdict(ValidationResult),
    Failure(TransportFailure),
}

impl AdapterOutcome {
    /// Create a transport failure outcome
    pub fn failure(adapter_id: AdapterId, reason: TransportReason, detail: impl Into<String>) -> Self {
        AdapterOutcome::Failure(TransportFailure {
            adapter_id,
            reason,
            detail: detail.into(),
        })
    }

    /// The verdict, if the adapter responded
    pub fn verdict(&self) -> Option<&ValidationResult> {
        match self {
            AdapterOutcome::Verdict(result) => Some(result),
            AdapterOutcome::Failure(_) => None,
        }
    }

    /// The failure, if the adapter was unreachable
    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        match self {
            AdapterOutcome::Verdict(_) => None,
            AdapterOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn is_verdict(&self) -> bool {
        matches!(self, AdapterOutcome::Verdict(_))
    }
}

impl From<ValidationResult> for AdapterOutcome {
    fn from(result: ValidationResult) -> Self {
        AdapterOutcome::Verdict(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_id_parse() {
        assert_eq!("golden".parse::<AdapterId>().ok(), Some(AdapterId::Golden));
        assert_eq!("Backend".parse::<AdapterId>().ok(), Some(AdapterId::Backend));
        assert_eq!("oracle".parse::<AdapterId>().ok(), Some(AdapterId::Legacy));
        assert!("bubble".parse::<AdapterId>().is_err());
    }

    #[test]
    fn test_outcome_accessors() {
        let verdict: AdapterOutcome = ValidationResult::valid(3).into();
        assert!(verdict.is_verdict());
        assert_eq!(verdict.verdict().and_then(|v| v.nights_count), Some(3));
        assert!(verdict.transport_failure().is_none());

        let failure = AdapterOutcome::failure(AdapterId::Legacy, TransportReason::AuthRequired, "login wall");
        assert!(!failure.is_verdict());
        assert_eq!(
            failure.transport_failure().map(|f| f.reason),
            Some(TransportReason::AuthRequired)
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let failure = AdapterOutcome::failure(AdapterId::Backend, TransportReason::Timeout, "5s");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "failure");
        assert_eq!(json["reason"], "TIMEOUT");
        assert_eq!(json["adapterId"], "backend");

        let verdict: AdapterOutcome = ValidationResult::valid(5).into();
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["kind"], "verdict");
        assert_eq!(json["nightsCount"], 5);
    }
}
