//! Scenario value object

use crate::schedule::Selection;
use serde::{Deserialize, Serialize};

/// One unit of validation work: a selection plus optional expectations
///
/// `expected_nights` / `expected_valid` of `None` mean "unknown", not "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub selection: Selection,
    pub expected_nights: Option<u32>,
    pub expected_valid: Option<bool>,
    pub description: String,
}

impl Scenario {
    /// Create a scenario with no expectations
    pub fn new(id: impl Into<String>, selection: Selection) -> Self {
        Self {
            id: id.into(),
            selection,
            expected_nights: None,
            expected_valid: None,
            description: String::new(),
        }
    }

    /// Expect a valid result with this night count
    pub fn expect_valid(mut self, nights: u32) -> Self {
        self.expected_nights = Some(nights);
        self.expected_valid = Some(true);
        self
    }

    /// Expect an invalid result, optionally with a night count
    pub fn expect_invalid(mut self, nights: Option<u32>) -> Self {
        self.expected_nights = nights;
        self.expected_valid = Some(false);
        self
    }

    pub fn with_expected_nights(mut self, nights: Option<u32>) -> Self {
        self.expected_nights = nights;
        self
    }

    pub fn with_expected_valid(mut self, valid: Option<bool>) -> Self {
        self.expected_valid = valid;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether any expectation was supplied
    pub fn has_expectation(&self) -> bool {
        self.expected_nights.is_some() || self.expected_valid.is_some()
    }
}
