//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Fallback AI provider must differ from the primary provider")]
    FallbackSameAsPrimary,

    #[error("Invalid scoring thresholds: {0}")]
    InvalidScoring(String),

    #[error("Default pass threshold must be within 0..=100")]
    InvalidPassThreshold,

    #[error("Scenario directory does not exist: {0}")]
    ScenarioDirMissing(PathBuf),
}
