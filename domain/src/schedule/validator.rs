//! Reference ("golden") schedule validation.
//!
//! Composes [`analyze`](super::contiguity::analyze) and
//! [`calculate_nights`](super::nights::calculate_nights) with a minimum-night
//! bound. Every other validator implementation is compared against this one.

use super::contiguity::analyze;
use super::nights::calculate_nights;
use super::selection::Selection;
use serde::{Deserialize, Serialize};

/// Default minimum number of nights for a valid recurring booking
pub const DEFAULT_MIN_NIGHTS: u32 = 2;

/// Business-rule failure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No days were selected
    EmptySelection,
    /// Days do not form one unbroken arc
    NonContiguous,
    /// Arc is contiguous but too short
    BelowMinimum,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::EmptySelection => "EMPTY_SELECTION",
            ErrorCode::NonContiguous => "NON_CONTIGUOUS",
            ErrorCode::BelowMinimum => "BELOW_MINIMUM",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ErrorCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "EMPTY_SELECTION" => Ok(ErrorCode::EmptySelection),
            "NON_CONTIGUOUS" => Ok(ErrorCode::NonContiguous),
            "BELOW_MINIMUM" => Ok(ErrorCode::BelowMinimum),
            other => Err(format!("Unknown error code: {}", other)),
        }
    }
}

/// Verdict of one validator about one selection
///
/// `None` fields mean "not determined", which is distinct from a determined
/// `false`. `nights_count` is only authoritative when `is_valid == Some(true)`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub nights_count: Option<u32>,
    pub is_valid: Option<bool>,
    pub error_code: Option<ErrorCode>,
    pub error_message: Option<String>,
}

impl ValidationResult {
    /// A valid selection with the given night count
    pub fn valid(nights: u32) -> Self {
        Self {
            nights_count: Some(nights),
            is_valid: Some(true),
            error_code: None,
            error_message: None,
        }
    }

    /// An invalid selection
    pub fn invalid(code: ErrorCode, nights: Option<u32>, message: impl Into<String>) -> Self {
        Self {
            nights_count: nights,
            is_valid: Some(false),
            error_code: Some(code),
            error_message: Some(message.into()),
        }
    }

    /// Whether this result is a determined positive verdict
    pub fn is_valid(&self) -> bool {
        self.is_valid == Some(true)
    }

    /// Night count, only when the verdict is valid
    pub fn authoritative_nights(&self) -> Option<u32> {
        if self.is_valid() { self.nights_count } else { None }
    }
}

/// The reference validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleValidator {
    min_nights: u32,
}

impl Default for ScheduleValidator {
    fn default() -> Self {
        Self {
            min_nights: DEFAULT_MIN_NIGHTS,
        }
    }
}

impl ScheduleValidator {
    pub fn new(min_nights: u32) -> Self {
        Self { min_nights }
    }

    pub fn min_nights(&self) -> u32 {
        self.min_nights
    }

    /// Validate a selection. Pure: identical input yields identical output.
    pub fn validate(&self, selection: &Selection) -> ValidationResult {
        if selection.is_empty() {
            return ValidationResult::invalid(
                ErrorCode::EmptySelection,
                None,
                "Please select at least one day",
            );
        }

        let analysis = analyze(selection);
        if !analysis.is_contiguous {
            // A gapped selection has no well-defined night count.
            return ValidationResult::invalid(
                ErrorCode::NonContiguous,
                None,
                "Selected days must be consecutive",
            );
        }

        let nights = calculate_nights(analysis.arc_length, analysis.is_full_week);
        if nights < self.min_nights {
            return ValidationResult::invalid(
                ErrorCode::BelowMinimum,
                Some(nights),
                format!(
                    "Minimum {} nights required, selection covers {}",
                    self.min_nights, nights
                ),
            );
        }

        ValidationResult::valid(nights)
    }
}

/// Validate with the default minimum of two nights
pub fn validate(selection: &Selection) -> ValidationResult {
    ScheduleValidator::default().validate(selection)
}
