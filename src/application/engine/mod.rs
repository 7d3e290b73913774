//! Session engine - async orchestration around the training aggregate.
//!
//! [`SessionEngine`] drives one session: it accepts trainee turns, fans
//! out to the capabilities through the [`Evaluator`], [`GoalTracker`] and
//! counterpart generator, then commits the staged result in one step.
//! [`SessionRegistry`] holds every live engine.

mod evaluator;
mod goal_tracker;
mod registry;
mod report_builder;
mod session_engine;

pub use evaluator::Evaluator;
pub use goal_tracker::GoalTracker;
pub use registry::SessionRegistry;
pub use report_builder::{ReportBuilder, ReportDraft};
pub use session_engine::{Capabilities, EngineSettings, SessionEngine};

use std::future::Future;
use std::time::Duration;

use crate::ports::CapabilityError;

/// Runs a capability call, failing with `Timeout` once `limit` elapses.
pub(crate) async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T, CapabilityError>
where
    F: Future<Output = Result<T, CapabilityError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(CapabilityError::Timeout(limit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn with_deadline_passes_through_result() {
        let result = with_deadline(Duration::from_secs(1), async { Ok::<_, CapabilityError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn with_deadline_times_out() {
        let result: Result<(), _> = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(CapabilityError::Timeout(Duration::from_millis(50))));
    }
}
