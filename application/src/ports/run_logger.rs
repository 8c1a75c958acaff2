//! Port for structured run logging.
//!
//! Defines the [`RunLogger`] trait for recording every [`ConsensusReport`]
//! to an append-only, machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures each
//! report in full for later audit.

use schedule_domain::ConsensusReport;

/// Port for logging consensus reports.
///
/// The `log` method is synchronous and non-fallible so that logging
/// failures never change a run's outcome.
pub trait RunLogger: Send + Sync {
    /// Record a finished report.
    fn log(&self, report: &ConsensusReport);
}

/// No-op implementation for tests and when run logging is disabled.
pub struct NoRunLogger;

impl RunLogger for NoRunLogger {
    fn log(&self, _report: &ConsensusReport) {}
}
