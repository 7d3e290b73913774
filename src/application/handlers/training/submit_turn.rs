//! SubmitTurnHandler - Command handler for trainee turns.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::training::{SubmittedTurns, TrainingError};

/// Command to submit one trainee turn.
#[derive(Debug, Clone)]
pub struct SubmitTurnCommand {
    pub session_id: SessionId,
    pub text: String,
}

/// Handler for submitting trainee turns.
pub struct SubmitTurnHandler {
    registry: Arc<SessionRegistry>,
}

impl SubmitTurnHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: SubmitTurnCommand) -> Result<SubmittedTurns, TrainingError> {
        let engine = self.registry.get(&cmd.session_id).await?;
        engine.submit_turn(&cmd.text).await
    }
}
