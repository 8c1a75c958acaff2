//! Output formatter trait

use schedule_application::SuiteResult;
use schedule_domain::ConsensusReport;

/// Trait for rendering consensus results
pub trait ReportFormatter {
    /// Format one scenario's report
    fn format_report(&self, report: &ConsensusReport) -> String;

    /// Format a whole suite run
    fn format_suite(&self, result: &SuiteResult) -> String;
}
