//! Multi-source consensus for schedule validation
//!
//! Several independently maintained validator implementations answer the
//! same [`Scenario`]. Their outcomes are compared, disagreements are recorded
//! as [`Discrepancy`] entries, and a [`Recommendation`] is issued.
//!
//! ```text
//! Scenario ──▶ adapters (golden, backend, legacy) ──▶ AdapterOutcome per adapter
//!                                                        │
//!                                   ConsensusEngine::compare
//!                                                        │
//!                                                        ▼
//!                     ConsensusReport ──(disagreement)──▶ DiscrepancyDocument
//! ```
//!
//! Unanimity is required for APPROVE or REJECT. A missing adapter is never
//! counted as agreement.

pub mod discrepancy;
pub mod engine;
pub mod fixtures;
pub mod outcome;
pub mod report;
pub mod reporter;
pub mod scenario;
pub mod summary;

pub use discrepancy::{Discrepancy, DiscrepancyType, Observed};
pub use engine::ConsensusEngine;
pub use fixtures::{find_scenario, standard_scenarios};
pub use outcome::{AdapterId, AdapterOutcome, TransportFailure, TransportReason};
pub use report::{ConsensusReport, Recommendation, RunState};
pub use reporter::{DiscrepancyDocument, DiscrepancyReporter};
pub use scenario::Scenario;
pub use summary::{SuiteSummary, render_summary_table};
