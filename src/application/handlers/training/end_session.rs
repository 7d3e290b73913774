//! EndSessionHandler - Command handler for ending a session.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::training::{SessionReport, TrainingError};

/// Command to end a session and produce its report.
#[derive(Debug, Clone)]
pub struct EndSessionCommand {
    pub session_id: SessionId,
}

/// Handler for ending sessions. Repeated calls return the cached report.
pub struct EndSessionHandler {
    registry: Arc<SessionRegistry>,
}

impl EndSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: EndSessionCommand) -> Result<SessionReport, TrainingError> {
        let engine = self.registry.get(&cmd.session_id).await?;
        engine.end_session().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::training::test_support::{registry, SALES};
    use crate::domain::foundation::ScenarioId;

    #[tokio::test]
    async fn report_reflects_scored_turns() {
        let registry = registry(65.0);
        let engine = registry.start(&ScenarioId::new(SALES).unwrap()).await.unwrap();
        engine.submit_turn("Thanks for having me.").await.unwrap();
        let handler = EndSessionHandler::new(Arc::clone(&registry));

        let report = handler
            .handle(EndSessionCommand {
                session_id: engine.id(),
            })
            .await
            .unwrap();

        assert_eq!(report.session_id, engine.id());
        assert_eq!(report.trainee_turns, 1);
        assert_eq!(report.overall_score.rounded(), 65);
        assert!(report.passed);
        assert_eq!(report.dimensions.len(), 4);
    }

    #[tokio::test]
    async fn second_call_returns_same_report() {
        let registry = registry(40.0);
        let engine = registry.start(&ScenarioId::new(SALES).unwrap()).await.unwrap();
        let handler = EndSessionHandler::new(Arc::clone(&registry));
        let cmd = EndSessionCommand {
            session_id: engine.id(),
        };

        let first = handler.handle(cmd.clone()).await.unwrap();
        let second = handler.handle(cmd).await.unwrap();
        assert_eq!(first, second);
    }
}
