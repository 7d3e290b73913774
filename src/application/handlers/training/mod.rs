//! Training handlers - commands and queries over the session registry.

mod delete_session;
mod end_session;
mod get_session;
mod list_scenarios;
mod reset_session;
mod start_session;
mod submit_turn;

pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use end_session::{EndSessionCommand, EndSessionHandler};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use list_scenarios::ListScenariosHandler;
pub use reset_session::{ResetSessionCommand, ResetSessionHandler};
pub use start_session::{StartSessionCommand, StartSessionHandler};
pub use submit_turn::{SubmitTurnCommand, SubmitTurnHandler};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::adapters::capabilities::{KeywordGoalClassifier, ScriptedCounterpart, ScriptedScorer};
    use crate::adapters::scenarios::InMemoryScenarioCatalog;
    use crate::application::engine::{Capabilities, EngineSettings, SessionRegistry};
    use crate::ports::RawTurnScore;

    pub const SALES: &str = "ltc-standard-sales";

    /// Registry over the built-in catalog with a fixed-score scorer.
    pub fn registry(score: f64) -> Arc<SessionRegistry> {
        registry_with(ScriptedScorer::new().with_default(RawTurnScore::new(score)))
    }

    pub fn registry_with(scorer: ScriptedScorer) -> Arc<SessionRegistry> {
        Arc::new(SessionRegistry::new(
            Arc::new(InMemoryScenarioCatalog::builtin()),
            Capabilities {
                counterpart: Arc::new(ScriptedCounterpart::new()),
                scorer: Arc::new(scorer),
                goal_classifier: Arc::new(KeywordGoalClassifier),
            },
            EngineSettings::default(),
        ))
    }
}
