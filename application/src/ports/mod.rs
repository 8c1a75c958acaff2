//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod progress;
pub mod report_sink;
pub mod run_logger;
pub mod validator_adapter;
