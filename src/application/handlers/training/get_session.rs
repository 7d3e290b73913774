//! GetSessionHandler - Query handler for the live session view.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::training::{SessionSnapshot, TrainingError};

/// Query to get a session snapshot by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

pub struct GetSessionHandler {
    registry: Arc<SessionRegistry>,
}

impl GetSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<SessionSnapshot, TrainingError> {
        let engine = self.registry.get(&query.session_id).await?;
        Ok(engine.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::training::test_support::{registry, SALES};
    use crate::domain::foundation::ScenarioId;

    #[tokio::test]
    async fn snapshot_tracks_goal_progress() {
        let registry = registry(70.0);
        let engine = registry.start(&ScenarioId::new(SALES).unwrap()).await.unwrap();
        engine
            .submit_turn("Before anything else, what budget range are you working with?")
            .await
            .unwrap();
        let handler = GetSessionHandler::new(Arc::clone(&registry));

        let snapshot = handler
            .handle(GetSessionQuery {
                session_id: engine.id(),
            })
            .await
            .unwrap();

        assert_eq!(snapshot.turns.len(), 4);
        let budget = snapshot
            .goals
            .iter()
            .find(|g| g.id().as_str() == "budget-concerns")
            .unwrap();
        assert!(budget.is_done());
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let handler = GetSessionHandler::new(registry(70.0));
        let result = handler
            .handle(GetSessionQuery {
                session_id: SessionId::new(),
            })
            .await;
        assert!(matches!(result, Err(TrainingError::SessionNotFound(_))));
    }
}
