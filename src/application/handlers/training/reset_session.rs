//! ResetSessionHandler - Command handler for restarting a session.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::training::{SessionSnapshot, TrainingError};

/// Command to discard progress and restart the session's scenario.
#[derive(Debug, Clone)]
pub struct ResetSessionCommand {
    pub session_id: SessionId,
}

pub struct ResetSessionHandler {
    registry: Arc<SessionRegistry>,
}

impl ResetSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: ResetSessionCommand) -> Result<SessionSnapshot, TrainingError> {
        let engine = self.registry.get(&cmd.session_id).await?;
        engine.reset().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::training::test_support::{registry, SALES};
    use crate::domain::foundation::{ScenarioId, SessionStatus};

    #[tokio::test]
    async fn reset_after_end_reopens_session() {
        let registry = registry(70.0);
        let engine = registry.start(&ScenarioId::new(SALES).unwrap()).await.unwrap();
        engine.submit_turn("Hello").await.unwrap();
        engine.end_session().await.unwrap();
        let handler = ResetSessionHandler::new(Arc::clone(&registry));

        let snapshot = handler
            .handle(ResetSessionCommand {
                session_id: engine.id(),
            })
            .await
            .unwrap();

        assert_eq!(snapshot.status, SessionStatus::Active);
        assert_eq!(snapshot.turns.len(), 2);
        assert!(snapshot.dimensions.iter().all(|d| d.score.value() == 0.0));
    }
}
