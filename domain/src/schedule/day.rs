//! Day value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of days in the recurring week cycle
pub const DAYS_PER_WEEK: usize = 7;

/// A day of the week (Value Object)
///
/// Days are indexed Sunday=0 through Saturday=6 and serialize as that index.
///
/// # Example
///
/// ```
/// use schedule_domain::schedule::Day;
///
/// let day: Day = "fri".parse().unwrap();
/// assert_eq!(day.index(), 5);
/// assert_eq!(day.offset(2), Day::Sunday); // wraps past Saturday
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in index order
    pub const ALL: [Day; DAYS_PER_WEEK] = [
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Index of this day (Sunday=0 … Saturday=6)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Look up a day by index, returning `None` outside 0-6
    pub fn from_index(index: u8) -> Option<Day> {
        Self::ALL.get(index as usize).copied()
    }

    /// The day `n` positions later on the circular week
    pub fn offset(self, n: usize) -> Day {
        Self::ALL[(self.index() as usize + n) % DAYS_PER_WEEK]
    }

    /// Full English name
    pub fn name(self) -> &'static str {
        match self {
            Day::Sunday => "Sunday",
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }

    /// Three-letter abbreviation (e.g., "Mon")
    pub fn short_name(self) -> &'static str {
        &self.name()[..3]
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl TryFrom<u8> for Day {
    type Error = DomainError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Day::from_index(index).ok_or_else(|| DomainError::InvalidDay(index.to_string()))
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.index()
    }
}

impl std::str::FromStr for Day {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Day::try_from(index);
        }

        let lower = trimmed.to_lowercase();
        Day::ALL
            .into_iter()
            .find(|day| {
                let name = day.name().to_lowercase();
                lower == name || (lower.len() >= 2 && name.starts_with(&lower))
            })
            .ok_or_else(|| DomainError::InvalidDay(trimmed.to_string()))
    }
}
