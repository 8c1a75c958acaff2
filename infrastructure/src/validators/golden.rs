//! In-process adapter over the reference validator

use async_trait::async_trait;
use schedule_application::ValidatorAdapter;
use schedule_domain::{AdapterId, AdapterOutcome, Scenario, ScheduleValidator};

/// Wraps [`ScheduleValidator`]; never fails to produce a verdict
#[derive(Debug, Clone, Default)]
pub struct GoldenAdapter {
    validator: ScheduleValidator,
}

impl GoldenAdapter {
    pub fn new(validator: ScheduleValidator) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl ValidatorAdapter for GoldenAdapter {
    fn id(&self) -> AdapterId {
        AdapterId::Golden
    }

    async fn evaluate(&self, scenario: &Scenario) -> AdapterOutcome {
        self.validator.validate(&scenario.selection).into()
    }
}
