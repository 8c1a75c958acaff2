//! Selection value object

use super::day::Day;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of selected weekdays for a recurring weekly booking (Value Object)
///
/// Insertion order is irrelevant; days are kept in index order. Selecting the
/// same day twice is a caller error and is reported rather than merged.
/// An empty selection is representable so validators can reject it.
///
/// # Example
///
/// ```
/// use schedule_domain::schedule::{Day, Selection};
///
/// let selection = Selection::parse_list("fri,sat,sun,mon").unwrap();
/// assert_eq!(selection.len(), 4);
/// assert!(selection.contains(Day::Sunday));
/// assert!(Selection::from_indices(&[1, 1]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Day>", into = "Vec<Day>")]
pub struct Selection {
    days: BTreeSet<Day>,
}

impl Selection {
    /// Create a selection, rejecting duplicate days
    pub fn new(days: impl IntoIterator<Item = Day>) -> Result<Self, DomainError> {
        let mut set = BTreeSet::new();
        for day in days {
            if !set.insert(day) {
                return Err(DomainError::DuplicateDay(day.name().to_string()));
            }
        }
        Ok(Self { days: set })
    }

    /// Create a selection from raw 0-6 indices
    pub fn from_indices(indices: &[u8]) -> Result<Self, DomainError> {
        let days = indices
            .iter()
            .map(|&i| Day::try_from(i))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }

    /// Parse a comma- or whitespace-separated list of day names or indices
    pub fn parse_list(input: &str) -> Result<Self, DomainError> {
        let days = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(str::parse::<Day>)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }

    /// The empty selection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every day of the week
    pub fn full_week() -> Self {
        Self {
            days: Day::ALL.into_iter().collect(),
        }
    }

    /// Build from an already-deduplicated set
    pub(crate) fn from_set(days: BTreeSet<Day>) -> Self {
        Self { days }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn contains(&self, day: Day) -> bool {
        self.days.contains(&day)
    }

    /// Iterate days in index order
    pub fn iter(&self) -> impl Iterator<Item = Day> + '_ {
        self.days.iter().copied()
    }

    /// Day indices in ascending order
    pub fn indices(&self) -> Vec<u8> {
        self.iter().map(Day::index).collect()
    }

    /// Compact index notation, e.g. `{0,1,5,6}`
    pub fn index_notation(&self) -> String {
        let inner = self
            .iter()
            .map(|d| d.index().to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{}}}", inner)
    }
}

impl std::fmt::Display for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "(none)");
        }
        let names = self
            .iter()
            .map(Day::short_name)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", names)
    }
}

impl TryFrom<Vec<Day>> for Selection {
    type Error = DomainError;

    fn try_from(days: Vec<Day>) -> Result<Self, Self::Error> {
        Selection::new(days)
    }
}

impl From<Selection> for Vec<Day> {
    fn from(selection: Selection) -> Self {
        selection.days.into_iter().collect()
    }
}
