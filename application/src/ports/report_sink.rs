//! Port for persisting discrepancy documents.

use schedule_domain::DiscrepancyDocument;
use thiserror::Error;

/// Errors that can occur while persisting a document
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for discrepancy documents that need manual follow-up
pub trait DiscrepancySink: Send + Sync {
    /// Persist one document, returning where it was stored
    fn persist(&self, document: &DiscrepancyDocument) -> Result<String, SinkError>;
}
