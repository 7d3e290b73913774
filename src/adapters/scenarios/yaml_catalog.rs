//! YAML scenario files and the in-memory catalog built from them.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::builtin::BUILTIN_SCENARIOS;
use crate::domain::foundation::ScenarioId;
use crate::domain::training::{
    Category, Difficulty, GoalSpec, Persona, ScenarioConfig, ScenarioError, ScenarioSummary,
};
use crate::ports::ScenarioCatalog;

/// Errors raised while loading scenarios.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {origin}: {source}")]
    Yaml {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("scenario '{scenario_id}' is invalid: {source}")]
    Invalid {
        scenario_id: String,
        #[source]
        source: ScenarioError,
    },

    #[error("scenario id '{0}' is defined more than once")]
    Duplicate(ScenarioId),
}

/// On-disk scenario shape. Threshold and weights may be omitted.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioDocument {
    scenario_id: ScenarioId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<Category>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    briefing_text: String,
    opening_counterpart_text: String,
    goals: Vec<GoalSpec>,
    rubric_dimension_labels: Vec<String>,
    #[serde(default)]
    pass_threshold: Option<f64>,
    #[serde(default)]
    dimension_weights: Option<Vec<f64>>,
    #[serde(default)]
    persona: Option<Persona>,
}

impl ScenarioDocument {
    fn into_config(self, default_pass_threshold: f64) -> ScenarioConfig {
        let dimension_weights = self.dimension_weights.unwrap_or_else(|| {
            let n = self.rubric_dimension_labels.len().max(1);
            vec![1.0 / n as f64; self.rubric_dimension_labels.len()]
        });

        ScenarioConfig {
            scenario_id: self.scenario_id,
            title: self.title,
            description: self.description,
            category: self.category,
            difficulty: self.difficulty,
            briefing_text: self.briefing_text,
            opening_counterpart_text: self.opening_counterpart_text,
            goals: self.goals,
            rubric_dimension_labels: self.rubric_dimension_labels,
            pass_threshold: self.pass_threshold.unwrap_or(default_pass_threshold),
            dimension_weights,
            persona: self.persona,
        }
    }
}

/// Parses scenarios from YAML text. `origin` names the source in errors.
///
/// A file holds one scenario or a list of them. The top-level shape picks
/// the target type, so a bad field is reported against that type with its
/// line and column.
pub fn parse_scenarios(
    yaml: &str,
    origin: &str,
    default_pass_threshold: f64,
) -> Result<Vec<ScenarioConfig>, CatalogError> {
    let yaml_err = |source: serde_yaml::Error| CatalogError::Yaml {
        origin: origin.to_string(),
        source,
    };

    let shape: serde_yaml::Value = serde_yaml::from_str(yaml).map_err(yaml_err)?;
    let documents: Vec<ScenarioDocument> = if shape.is_sequence() {
        serde_yaml::from_str(yaml).map_err(yaml_err)?
    } else {
        vec![serde_yaml::from_str(yaml).map_err(yaml_err)?]
    };

    Ok(documents
        .into_iter()
        .map(|doc| doc.into_config(default_pass_threshold))
        .collect())
}

/// Loads every `.yaml`/`.yml` file in `dir`, in file name order.
pub fn load_scenario_dir(
    dir: &Path,
    default_pass_threshold: f64,
) -> Result<Vec<ScenarioConfig>, CatalogError> {
    let io_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| CatalogError::Io { path, source }
    };

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(io_err(dir))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("yaml") | Some("yml")
            )
        })
        .collect();
    files.sort();

    let mut scenarios = Vec::new();
    for path in files {
        let yaml = std::fs::read_to_string(&path).map_err(io_err(&path))?;
        let loaded = parse_scenarios(&yaml, &path.display().to_string(), default_pass_threshold)?;
        tracing::debug!(path = %path.display(), count = loaded.len(), "Loaded scenario file");
        scenarios.extend(loaded);
    }
    Ok(scenarios)
}

/// Scenario catalog held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScenarioCatalog {
    scenarios: Vec<Arc<ScenarioConfig>>,
}

impl InMemoryScenarioCatalog {
    /// Builds a catalog, validating every scenario and rejecting duplicate ids.
    pub fn from_scenarios(
        scenarios: impl IntoIterator<Item = ScenarioConfig>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();
        catalog.extend(scenarios)?;
        Ok(catalog)
    }

    /// The built-in scenario library.
    pub fn builtin() -> Self {
        Self {
            scenarios: BUILTIN_SCENARIOS.clone(),
        }
    }

    /// Built-in library plus every scenario file in `dir`.
    pub fn with_scenario_dir(dir: &Path, default_pass_threshold: f64) -> Result<Self, CatalogError> {
        let mut catalog = Self::builtin();
        catalog.extend(load_scenario_dir(dir, default_pass_threshold)?)?;
        Ok(catalog)
    }

    fn extend(
        &mut self,
        scenarios: impl IntoIterator<Item = ScenarioConfig>,
    ) -> Result<(), CatalogError> {
        let mut seen: HashSet<ScenarioId> =
            self.scenarios.iter().map(|s| s.scenario_id.clone()).collect();

        for scenario in scenarios {
            scenario.validate().map_err(|source| CatalogError::Invalid {
                scenario_id: scenario.scenario_id.to_string(),
                source,
            })?;
            if !seen.insert(scenario.scenario_id.clone()) {
                return Err(CatalogError::Duplicate(scenario.scenario_id));
            }
            self.scenarios.push(Arc::new(scenario));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl ScenarioCatalog for InMemoryScenarioCatalog {
    fn get(&self, id: &ScenarioId) -> Option<Arc<ScenarioConfig>> {
        self.scenarios
            .iter()
            .find(|s| &s.scenario_id == id)
            .cloned()
    }

    fn list(&self) -> Vec<ScenarioSummary> {
        self.scenarios.iter().map(|s| s.summary()).collect()
    }
}
