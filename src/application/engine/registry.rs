//! SessionRegistry - live sessions keyed by id.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{Capabilities, EngineSettings, SessionEngine};
use crate::domain::foundation::{ScenarioId, SessionId};
use crate::domain::training::TrainingError;
use crate::ports::ScenarioCatalog;

/// Creates sessions from the scenario catalog and hands out their engines.
///
/// Sessions live in memory until they are removed or sit idle longer than
/// the eviction window.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEngine>>>,
    catalog: Arc<dyn ScenarioCatalog>,
    capabilities: Capabilities,
    settings: EngineSettings,
}

impl SessionRegistry {
    pub fn new(
        catalog: Arc<dyn ScenarioCatalog>,
        capabilities: Capabilities,
        settings: EngineSettings,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            catalog,
            capabilities,
            settings,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn ScenarioCatalog> {
        &self.catalog
    }

    /// Starts a session for a catalog scenario.
    ///
    /// # Errors
    ///
    /// - `ScenarioNotFound` if the catalog has no such scenario
    /// - `ConfigInvalid` if the scenario fails validation
    pub async fn start(&self, scenario_id: &ScenarioId) -> Result<Arc<SessionEngine>, TrainingError> {
        let scenario = self
            .catalog
            .get(scenario_id)
            .ok_or_else(|| TrainingError::ScenarioNotFound(scenario_id.to_string()))?;

        let engine = Arc::new(SessionEngine::start(
            scenario,
            self.capabilities.clone(),
            self.settings,
        )?);

        self.sessions
            .write()
            .await
            .insert(engine.id(), Arc::clone(&engine));
        Ok(engine)
    }

    /// Looks up a live session.
    pub async fn get(&self, id: &SessionId) -> Result<Arc<SessionEngine>, TrainingError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(TrainingError::SessionNotFound(*id))
    }

    /// Drops a session. In-flight operations on an engine already handed
    /// out still finish.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if no such session is live
    pub async fn remove(&self, id: &SessionId) -> Result<(), TrainingError> {
        self.sessions
            .write()
            .await
            .remove(id)
            .ok_or(TrainingError::SessionNotFound(*id))?;
        debug!(session_id = %id, "Training session removed");
        Ok(())
    }

    /// Drops sessions idle for at least `max_idle`. Busy sessions stay.
    /// Returns how many were evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, engine| engine.is_busy() || engine.idle_for() < max_idle);
        before - sessions.len()
    }

    /// Runs [`evict_idle`](Self::evict_idle) every `every` until the
    /// registry is dropped.
    pub fn spawn_eviction(self: &Arc<Self>, max_idle: Duration, every: Duration) -> JoinHandle<()> {
        let registry: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(every);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                let Some(live) = registry.upgrade() else {
                    break;
                };
                let evicted = live.evict_idle(max_idle).await;
                if evicted > 0 {
                    let remaining = live.len().await;
                    info!(evicted, remaining, "Evicted idle training sessions");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
