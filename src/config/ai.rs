//! AI provider configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<Secret<String>>,

    /// Anthropic API key
    pub anthropic_api_key: Option<Secret<String>>,

    /// Primary AI provider
    #[serde(default = "default_provider")]
    pub primary_provider: AiProvider,

    /// Fallback AI provider
    pub fallback_provider: Option<AiProvider>,

    /// Model used with OpenAI
    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    /// Model used with Anthropic
    #[serde(default = "default_anthropic_model")]
    pub anthropic_model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum retries on failure
    #[serde(default = "default_retries")]
    pub max_retries: u32,
}

/// AI provider type
///
/// `mock` runs the trainer offline with scripted counterparts and
/// heuristic scoring.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    OpenAI,
    Anthropic,
    #[default]
    Mock,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// OpenAI key, if one is set and non-empty
    pub fn openai_key(&self) -> Option<&str> {
        non_empty(self.openai_api_key.as_ref())
    }

    /// Anthropic key, if one is set and non-empty
    pub fn anthropic_key(&self) -> Option<&str> {
        non_empty(self.anthropic_api_key.as_ref())
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_key().is_some()
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_key().is_some()
    }

    /// Check if the trainer runs without any remote provider
    pub fn is_mock(&self) -> bool {
        self.primary_provider == AiProvider::Mock
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.require_key(self.primary_provider)?;

        if let Some(fallback) = self.fallback_provider {
            if fallback == self.primary_provider {
                return Err(ValidationError::FallbackSameAsPrimary);
            }
            self.require_key(fallback)?;
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        Ok(())
    }

    fn require_key(&self, provider: AiProvider) -> Result<(), ValidationError> {
        match provider {
            AiProvider::OpenAI if !self.has_openai() => {
                Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
            }
            AiProvider::Anthropic if !self.has_anthropic() => {
                Err(ValidationError::MissingRequired("ANTHROPIC_API_KEY"))
            }
            _ => Ok(()),
        }
    }
}

fn non_empty(key: Option<&Secret<String>>) -> Option<&str> {
    key.map(|k| k.expose_secret().as_str())
        .filter(|k| !k.trim().is_empty())
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_provider(),
            fallback_provider: None,
            openai_model: default_openai_model(),
            anthropic_model: default_anthropic_model(),
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
        }
    }
}

fn default_provider() -> AiProvider {
    AiProvider::Mock
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_timeout() -> u64 {
    60
}

fn default_retries() -> u32 {
    3
}
