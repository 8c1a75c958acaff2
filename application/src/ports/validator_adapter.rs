//! Validator adapter port
//!
//! Defines the uniform interface over heterogeneous validator sources.

use async_trait::async_trait;
use schedule_domain::{AdapterId, AdapterOutcome, Scenario};

/// One validator implementation, normalized to a common outcome shape
///
/// Implementations live in the infrastructure layer. Each call owns its own
/// execution context: nothing an adapter does for one scenario may leak into
/// another. Failures to reach a verdict are returned as
/// [`AdapterOutcome::Failure`], never as a panic or a guessed verdict.
#[async_trait]
pub trait ValidatorAdapter: Send + Sync {
    /// Which source this adapter wraps
    fn id(&self) -> AdapterId;

    /// Evaluate one scenario's selection
    async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome;
}
