//! Application layer for schedule-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ConsensusParams;
pub use ports::{
    progress::{ConsensusProgressNotifier, NoProgress},
    report_sink::{DiscrepancySink, SinkError},
    run_logger::{NoRunLogger, RunLogger},
    validator_adapter::ValidatorAdapter,
};
pub use use_cases::run_consensus::{RunConsensusError, RunConsensusUseCase};
pub use use_cases::run_suite::{PersistedDocument, RunSuiteUseCase, SuiteResult};
