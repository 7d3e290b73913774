//! StartSessionHandler - Command handler for starting a training session.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::ScenarioId;
use crate::domain::training::{SessionSnapshot, TrainingError};

/// Command to start a session for a catalog scenario.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub scenario_id: ScenarioId,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    registry: Arc<SessionRegistry>,
}

impl StartSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<SessionSnapshot, TrainingError> {
        let engine = self.registry.start(&cmd.scenario_id).await?;
        Ok(engine.snapshot().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::training::test_support::{registry, SALES};
    use crate::domain::foundation::SessionStatus;
    use crate::domain::training::Sender;

    #[tokio::test]
    async fn starts_with_briefing_and_opening_line() {
        let handler = StartSessionHandler::new(registry(70.0));
        let snapshot = handler
            .handle(StartSessionCommand {
                scenario_id: ScenarioId::new(SALES).unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(snapshot.status, SessionStatus::Active);
        assert_eq!(snapshot.turns.len(), 2);
        assert_eq!(snapshot.turns[0].sender(), Sender::System);
        assert!(snapshot.turns[0].text().contains("Identify decision maker"));
        assert!(snapshot.goals.iter().all(|g| !g.is_done()));
    }

    #[tokio::test]
    async fn unknown_scenario_is_not_found() {
        let handler = StartSessionHandler::new(registry(70.0));
        let result = handler
            .handle(StartSessionCommand {
                scenario_id: ScenarioId::new("missing").unwrap(),
            })
            .await;

        assert!(matches!(result, Err(TrainingError::ScenarioNotFound(_))));
    }
}
