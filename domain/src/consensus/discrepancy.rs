//! Discrepancy types
//!
//! A discrepancy is a recorded disagreement, either between two adapters or
//! between one adapter and a known expected value.

use super::outcome::AdapterId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Kind of disagreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyType {
    /// Two adapters reported different night counts
    NightsMismatch,
    /// Two adapters disagreed on validity
    ValidityMismatch,
    /// Golden disagreed with the expected outcome
    GoldenWrong,
    /// Backend disagreed with the expected outcome
    BackendWrong,
    /// Legacy oracle disagreed with the expected outcome
    LegacyWrong,
}

impl DiscrepancyType {
    /// The tag that blames a specific adapter for missing the expectation
    pub fn wrong(adapter: AdapterId) -> Self {
        match adapter {
            AdapterId::Golden => DiscrepancyType::GoldenWrong,
            AdapterId::Backend => DiscrepancyType::BackendWrong,
            AdapterId::Legacy => DiscrepancyType::LegacyWrong,
        }
    }

    /// The adapter blamed by an `<ADAPTER>_WRONG` tag
    pub fn blamed_adapter(&self) -> Option<AdapterId> {
        match self {
            DiscrepancyType::GoldenWrong => Some(AdapterId::Golden),
            DiscrepancyType::BackendWrong => Some(AdapterId::Backend),
            DiscrepancyType::LegacyWrong => Some(AdapterId::Legacy),
            _ => None,
        }
    }

    /// Whether this is a disagreement between adapters (vs. against an expectation)
    pub fn is_pairwise(&self) -> bool {
        matches!(
            self,
            DiscrepancyType::NightsMismatch | DiscrepancyType::ValidityMismatch
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiscrepancyType::NightsMismatch => "NIGHTS_MISMATCH",
            DiscrepancyType::ValidityMismatch => "VALIDITY_MISMATCH",
            DiscrepancyType::GoldenWrong => "GOLDEN_WRONG",
            DiscrepancyType::BackendWrong => "BACKEND_WRONG",
            DiscrepancyType::LegacyWrong => "LEGACY_WRONG",
        }
    }
}

impl std::fmt::Display for DiscrepancyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A compared value: either a night count or a validity flag
///
/// `None` inside a variant means the adapter did not determine the value.
/// Serialized bare (`7`, `true`, `null`); the owning [`Discrepancy`] decides
/// which variant a bare value reads back as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Observed {
    Nights(Option<u32>),
    Validity(Option<bool>),
}

impl std::fmt::Display for Observed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Observed::Nights(Some(n)) => write!(f, "{} nights", n),
            Observed::Validity(Some(true)) => write!(f, "valid"),
            Observed::Validity(Some(false)) => write!(f, "invalid"),
            Observed::Nights(None) | Observed::Validity(None) => write!(f, "null"),
        }
    }
}

/// A single recorded disagreement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDiscrepancy")]
pub struct Discrepancy {
    #[serde(rename = "type")]
    pub kind: DiscrepancyType,
    pub message: String,
    pub values: BTreeMap<AdapterId, Observed>,
    pub expected: Option<Observed>,
}

impl Discrepancy {
    /// Disagreement between two adapters
    pub fn between(
        kind: DiscrepancyType,
        (a, a_value): (AdapterId, Observed),
        (b, b_value): (AdapterId, Observed),
    ) -> Self {
        let message = format!(
            "{} reports {} but {} reports {}",
            a.label(),
            a_value,
            b.label(),
            b_value
        );
        Self {
            kind,
            message,
            values: BTreeMap::from([(a, a_value), (b, b_value)]),
            expected: None,
        }
    }

    /// One adapter missed the expected value
    pub fn against_expected(adapter: AdapterId, observed: Observed, expected: Observed) -> Self {
        Self {
            kind: DiscrepancyType::wrong(adapter),
            message: format!(
                "{} reports {}, expected {}",
                adapter.label(),
                observed,
                expected
            ),
            values: BTreeMap::from([(adapter, observed)]),
            expected: Some(expected),
        }
    }

    /// Whether this discrepancy concerns night counts
    pub fn is_about_nights(&self) -> bool {
        self.values
            .values()
            .chain(self.expected.iter())
            .any(|v| matches!(v, Observed::Nights(_)))
    }
}

/// Wire form of a [`Discrepancy`] before its values are given an axis
#[derive(Deserialize)]
struct RawDiscrepancy {
    #[serde(rename = "type")]
    kind: DiscrepancyType,
    message: String,
    values: BTreeMap<AdapterId, Option<RawObserved>>,
    expected: Option<RawObserved>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum RawObserved {
    Nights(u32),
    Validity(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Nights,
    Validity,
}

impl RawObserved {
    fn axis(&self) -> Axis {
        match self {
            RawObserved::Nights(_) => Axis::Nights,
            RawObserved::Validity(_) => Axis::Validity,
        }
    }
}

impl Axis {
    fn observe(self, raw: Option<RawObserved>) -> Result<Observed, String> {
        match (self, raw) {
            (Axis::Nights, None) => Ok(Observed::Nights(None)),
            (Axis::Nights, Some(RawObserved::Nights(n))) => Ok(Observed::Nights(Some(n))),
            (Axis::Validity, None) => Ok(Observed::Validity(None)),
            (Axis::Validity, Some(RawObserved::Validity(b))) => Ok(Observed::Validity(Some(b))),
            (Axis::Nights, Some(RawObserved::Validity(b))) => {
                Err(format!("expected a night count, found {}", b))
            }
            (Axis::Validity, Some(RawObserved::Nights(n))) => {
                Err(format!("expected a validity flag, found {}", n))
            }
        }
    }
}

impl TryFrom<RawDiscrepancy> for Discrepancy {
    type Error = String;

    fn try_from(raw: RawDiscrepancy) -> Result<Self, Self::Error> {
        let axis = match raw.kind {
            DiscrepancyType::NightsMismatch => Axis::Nights,
            DiscrepancyType::ValidityMismatch => Axis::Validity,
            // `<ADAPTER>_WRONG` compares against a known value, so the
            // expectation (or any determined value) fixes the axis
            _ => raw
                .expected
                .iter()
                .chain(raw.values.values().flatten())
                .map(RawObserved::axis)
                .next()
                .ok_or_else(|| {
                    format!("{} discrepancy has no value to compare", raw.kind)
                })?,
        };

        let values = raw
            .values
            .into_iter()
            .map(|(adapter, value)| Ok((adapter, axis.observe(value)?)))
            .collect::<Result<BTreeMap<_, _>, String>>()?;
        let expected = raw.expected.map(|e| axis.observe(Some(e))).transpose()?;

        Ok(Self {
            kind: raw.kind,
            message: raw.message,
            values,
            expected,
        })
    }
}
