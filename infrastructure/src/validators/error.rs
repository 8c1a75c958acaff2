//! Adapter error types

use schedule_domain::{AdapterId, AdapterOutcome, TransportReason};
use thiserror::Error;

/// Errors raised while talking to an external validator
///
/// Every variant maps onto exactly one [`TransportReason`]; adapters convert
/// these into [`AdapterOutcome::Failure`] at their boundary.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Unreachable: {0}")]
    Unreachable(String),

    #[error("Could not parse response: {0}")]
    Parse(String),
}

impl AdapterError {
    pub fn reason(&self) -> TransportReason {
        match self {
            AdapterError::AuthRequired(_) => TransportReason::AuthRequired,
            AdapterError::Timeout(_) => TransportReason::Timeout,
            AdapterError::Unreachable(_) => TransportReason::Unreachable,
            AdapterError::Parse(_) => TransportReason::ParseError,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AdapterError::AuthRequired(d)
            | AdapterError::Timeout(d)
            | AdapterError::Unreachable(d)
            | AdapterError::Parse(d) => d,
        }
    }

    /// Convert into the failure outcome for `adapter`
    pub fn into_outcome(self, adapter: AdapterId) -> AdapterOutcome {
        AdapterOutcome::failure(adapter, self.reason(), self.detail().to_string())
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AdapterError::Timeout(e.to_string())
        } else if e.is_decode() {
            AdapterError::Parse(e.to_string())
        } else if let Some(status) = e.status()
            && matches!(status.as_u16(), 401 | 403)
        {
            AdapterError::AuthRequired(format!("HTTP {}", status.as_u16()))
        } else {
            AdapterError::Unreachable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        assert_eq!(
            AdapterError::AuthRequired("login".into()).reason(),
            TransportReason::AuthRequired
        );
        assert_eq!(
            AdapterError::Timeout("slow".into()).reason(),
            TransportReason::Timeout
        );
        assert_eq!(
            AdapterError::Unreachable("refused".into()).reason(),
            TransportReason::Unreachable
        );
        assert_eq!(
            AdapterError::Parse("garbage".into()).reason(),
            TransportReason::ParseError
        );
    }

    #[test]
    fn test_into_outcome_keeps_detail() {
        let outcome = AdapterError::Parse("no verdict text".into()).into_outcome(AdapterId::Legacy);
        let failure = outcome.transport_failure().unwrap();
        assert_eq!(failure.adapter_id, AdapterId::Legacy);
        assert_eq!(failure.reason, TransportReason::ParseError);
        assert_eq!(failure.detail, "no verdict text");
    }
}
