//! Scenario catalog port.

use std::sync::Arc;

use crate::domain::foundation::ScenarioId;
use crate::domain::training::{ScenarioConfig, ScenarioSummary};

/// Read access to the scenarios a trainee can start.
///
/// Catalogs are loaded once at startup, so lookups are synchronous.
pub trait ScenarioCatalog: Send + Sync {
    /// Finds a scenario by id.
    fn get(&self, id: &ScenarioId) -> Option<Arc<ScenarioConfig>>;

    /// Lists all scenarios in display order.
    fn list(&self) -> Vec<ScenarioSummary>;
}
