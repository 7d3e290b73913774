//! Training engine configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::EngineSettings;
use crate::domain::training::{
    ScoringPolicy, DEFAULT_NEUTRAL_MIN, DEFAULT_POSITIVE_MIN, DEFAULT_ROLLUP_WEIGHT,
};

/// Scoring thresholds, capability timeouts and scenario sources
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Weight of the newest turn in each rubric dimension rollup
    #[serde(default = "default_rollup_weight")]
    pub rollup_weight: f64,

    /// Lowest score rated as positive feedback
    #[serde(default = "default_positive_min")]
    pub positive_min: f64,

    /// Lowest score rated as neutral feedback
    #[serde(default = "default_neutral_min")]
    pub neutral_min: f64,

    /// Bound on each counterpart, scoring or goal check call
    #[serde(default = "default_capability_timeout")]
    pub capability_timeout_secs: u64,

    /// Sessions untouched for this long are evicted
    #[serde(default = "default_session_idle_timeout")]
    pub session_idle_timeout_secs: u64,

    /// How often the idle sweep runs
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,

    /// Directory of extra YAML scenario files
    pub scenario_dir: Option<PathBuf>,

    /// Pass threshold for YAML scenarios that do not set one
    #[serde(default = "default_pass_threshold")]
    pub default_pass_threshold: f64,
}

impl TrainingConfig {
    pub fn capability_timeout(&self) -> Duration {
        Duration::from_secs(self.capability_timeout_secs)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_secs)
    }

    /// Scoring policy built from the configured thresholds
    pub fn scoring_policy(&self) -> Result<ScoringPolicy, ValidationError> {
        ScoringPolicy::new(self.positive_min, self.neutral_min, self.rollup_weight)
            .map_err(|e| ValidationError::InvalidScoring(e.to_string()))
    }

    /// Settings shared by every session engine
    pub fn engine_settings(&self) -> Result<EngineSettings, ValidationError> {
        Ok(EngineSettings {
            policy: self.scoring_policy()?,
            capability_timeout: self.capability_timeout(),
        })
    }

    /// Validate training configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.scoring_policy()?;

        if self.capability_timeout_secs == 0
            || self.session_idle_timeout_secs == 0
            || self.eviction_interval_secs == 0
        {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=100.0).contains(&self.default_pass_threshold) {
            return Err(ValidationError::InvalidPassThreshold);
        }
        if let Some(dir) = &self.scenario_dir {
            if !dir.is_dir() {
                return Err(ValidationError::ScenarioDirMissing(dir.clone()));
            }
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            rollup_weight: default_rollup_weight(),
            positive_min: default_positive_min(),
            neutral_min: default_neutral_min(),
            capability_timeout_secs: default_capability_timeout(),
            session_idle_timeout_secs: default_session_idle_timeout(),
            eviction_interval_secs: default_eviction_interval(),
            scenario_dir: None,
            default_pass_threshold: default_pass_threshold(),
        }
    }
}

fn default_rollup_weight() -> f64 {
    DEFAULT_ROLLUP_WEIGHT
}

fn default_positive_min() -> f64 {
    DEFAULT_POSITIVE_MIN
}

fn default_neutral_min() -> f64 {
    DEFAULT_NEUTRAL_MIN
}

fn default_capability_timeout() -> u64 {
    30
}

fn default_session_idle_timeout() -> u64 {
    3600
}

fn default_eviction_interval() -> u64 {
    60
}

fn default_pass_threshold() -> f64 {
    60.0
}
