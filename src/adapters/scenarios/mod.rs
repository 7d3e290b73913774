//! Scenario catalog adapters.

mod builtin;
mod yaml_catalog;

pub use builtin::BUILTIN_PASS_THRESHOLD;
pub use yaml_catalog::{load_scenario_dir, parse_scenarios, CatalogError, InMemoryScenarioCatalog};
