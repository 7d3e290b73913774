//! DeleteSessionHandler - Command handler for discarding a session.

use std::sync::Arc;

use crate::application::engine::SessionRegistry;
use crate::domain::foundation::SessionId;
use crate::domain::training::TrainingError;

/// Command to drop a session from the registry.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

pub struct DeleteSessionHandler {
    registry: Arc<SessionRegistry>,
}

impl DeleteSessionHandler {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<(), TrainingError> {
        self.registry.remove(&cmd.session_id).await
    }
}
