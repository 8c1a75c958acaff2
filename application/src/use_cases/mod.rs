//! Use cases (application services)

pub mod run_consensus;
pub mod run_suite;
