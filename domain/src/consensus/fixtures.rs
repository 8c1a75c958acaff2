//! Named scenario fixtures
//!
//! The first five fixtures are the reference cases every validator source must
//! agree on; the rest exercise wraparound and boundary shapes.

use super::scenario::Scenario;
use crate::core::error::DomainError;
use crate::schedule::{Day, Selection};
use std::collections::BTreeSet;

fn days(list: &[Day]) -> Selection {
    Selection::from_set(list.iter().copied().collect::<BTreeSet<_>>())
}

/// The standard fixture catalog, in run order
pub fn standard_scenarios() -> Vec<Scenario> {
    use Day::*;

    vec![
        Scenario::new(
            "mon-sat",
            days(&[Monday, Tuesday, Wednesday, Thursday, Friday, Saturday]),
        )
        .expect_valid(5)
        .with_description("Monday through Saturday"),
        Scenario::new("fri-mon-wrap", days(&[Friday, Saturday, Sunday, Monday]))
            .expect_valid(3)
            .with_description("Friday through Monday, crossing the week boundary"),
        Scenario::new("full-week", Selection::full_week())
            .expect_valid(7)
            .with_description("All seven days (full-time special case)"),
        Scenario::new("mon-wed-fri", days(&[Monday, Wednesday, Friday]))
            .expect_invalid(None)
            .with_description("Alternating days with gaps"),
        Scenario::new("mon-tue", days(&[Monday, Tuesday]))
            .expect_invalid(Some(1))
            .with_description("Two days, one night, below the minimum"),
        Scenario::new("sat-mon-wrap", days(&[Saturday, Sunday, Monday]))
            .expect_valid(2)
            .with_description("Shortest valid arc across the week boundary"),
        Scenario::new(
            "thu-tue-wrap",
            days(&[Thursday, Friday, Saturday, Sunday, Monday, Tuesday]),
        )
        .expect_valid(5)
        .with_description("Six days wrapping the weekend, Wednesday excluded"),
        Scenario::new(
            "sun-fri",
            days(&[Sunday, Monday, Tuesday, Wednesday, Thursday, Friday]),
        )
        .expect_valid(5)
        .with_description("Six days starting on Sunday"),
        Scenario::new("fri-sun-mon-gap", days(&[Friday, Sunday, Monday]))
            .expect_invalid(None)
            .with_description("Saturday missing inside an otherwise wrapping arc"),
        Scenario::new("single-day", days(&[Wednesday]))
            .expect_invalid(Some(0))
            .with_description("A single day has no overnight stay"),
    ]
}

/// Look up a fixture by id
pub fn find_scenario(id: &str) -> Result<Scenario, DomainError> {
    standard_scenarios()
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| DomainError::UnknownScenario(id.to_string()))
}
