//! Output format value object

use serde::{Deserialize, Serialize};

/// How consensus results are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Colored per-adapter breakdown (default)
    #[default]
    Full,
    /// Raw `ConsensusReport` JSON
    Json,
    /// Markdown summary table and discrepancy documents
    Markdown,
}
