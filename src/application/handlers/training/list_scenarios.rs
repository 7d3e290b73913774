//! ListScenariosHandler - Query handler for the scenario catalog.

use std::sync::Arc;

use crate::domain::training::ScenarioSummary;
use crate::ports::ScenarioCatalog;

pub struct ListScenariosHandler {
    catalog: Arc<dyn ScenarioCatalog>,
}

impl ListScenariosHandler {
    pub fn new(catalog: Arc<dyn ScenarioCatalog>) -> Self {
        Self { catalog }
    }

    pub fn handle(&self) -> Vec<ScenarioSummary> {
        self.catalog.list()
    }
}
