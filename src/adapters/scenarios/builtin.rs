//! Built-in scenario library, embedded in the binary.

use once_cell::sync::Lazy;
use std::sync::Arc;

use super::yaml_catalog::parse_scenarios;
use crate::domain::training::ScenarioConfig;

/// Pass threshold for built-in scenarios that do not set their own.
pub const BUILTIN_PASS_THRESHOLD: f64 = 60.0;

const BUILTIN_YAML: &str = include_str!("builtin_scenarios.yaml");

pub(super) static BUILTIN_SCENARIOS: Lazy<Vec<Arc<ScenarioConfig>>> = Lazy::new(|| {
    parse_scenarios(BUILTIN_YAML, "builtin_scenarios.yaml", BUILTIN_PASS_THRESHOLD)
        .expect("embedded scenario library must parse")
        .into_iter()
        .map(Arc::new)
        .collect()
});
