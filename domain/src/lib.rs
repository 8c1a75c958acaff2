//! Domain layer for schedule-quorum
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Schedule
//!
//! A recurring weekly booking selects a set of weekdays. The selection must
//! form one unbroken arc on the circular week; its night count is the arc
//! length minus the checkout day, except the full week which counts 7.
//!
//! ## Consensus
//!
//! Independent validator implementations answer the same scenario and must
//! agree unanimously. Disagreement is escalated with a discrepancy document,
//! never settled by majority.

pub mod config;
pub mod consensus;
pub mod core;
pub mod schedule;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use consensus::{
    AdapterId, AdapterOutcome, ConsensusEngine, ConsensusReport, Discrepancy,
    DiscrepancyDocument, DiscrepancyReporter, DiscrepancyType, Observed, Recommendation,
    RunState, Scenario, SuiteSummary, TransportFailure, TransportReason, find_scenario,
    render_summary_table, standard_scenarios,
};
pub use core::error::DomainError;
pub use schedule::{
    ArcAnalysis, DEFAULT_MIN_NIGHTS, Day, ErrorCode, ScheduleValidator, Selection,
    ValidationResult, analyze, calculate_nights, validate,
};
