//! AI Provider Port - Interface for LLM provider integrations.
//!
//! The LLM-backed training capabilities (counterpart replies, turn scoring,
//! goal checks, report narratives) all go through this port, so the
//! concrete vendor (OpenAI, Anthropic, mock) is chosen by configuration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ScenarioId;

/// Port for AI/LLM provider interactions.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Generate a single completion.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError>;

    /// Rough token estimate for prompt budgeting.
    fn estimate_tokens(&self, text: &str) -> u32;

    /// Provider name and model.
    fn provider_info(&self) -> ProviderInfo;
}

/// Lets a provider chosen at startup sit inside generic wrappers.
#[async_trait]
impl<T: AIProvider + ?Sized> AIProvider for std::sync::Arc<T> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        (**self).complete(request).await
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        (**self).estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        (**self).provider_info()
    }
}

/// Request for AI completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub messages: Vec<Message>,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    /// 0.0 is deterministic; scoring requests keep this low.
    pub temperature: Option<f32>,
    pub metadata: RequestMetadata,
}

impl CompletionRequest {
    /// Creates a new completion request with required metadata.
    pub fn new(metadata: RequestMetadata) -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
            metadata,
        }
    }

    /// Adds a message to the conversation.
    pub fn with_message(mut self, role: MessageRole, content: impl Into<String>) -> Self {
        self.messages.push(Message::new(role, content));
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Role of the message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// What a completion is for. Used for tracing and by the mock provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestPurpose {
    CounterpartTurn,
    TurnScore,
    GoalCheck,
    Narrative,
}

impl fmt::Display for RequestPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestPurpose::CounterpartTurn => "counterpart_turn",
            RequestPurpose::TurnScore => "turn_score",
            RequestPurpose::GoalCheck => "goal_check",
            RequestPurpose::Narrative => "narrative",
        };
        write!(f, "{}", s)
    }
}

/// Request metadata for tracing. Session context comes from the enclosing
/// `training::*` span rather than from the request.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    pub purpose: RequestPurpose,
    pub scenario_id: Option<ScenarioId>,
    pub trace_id: String,
}

impl RequestMetadata {
    pub fn new(purpose: RequestPurpose, trace_id: impl Into<String>) -> Self {
        Self {
            purpose,
            scenario_id: None,
            trace_id: trace_id.into(),
        }
    }

    pub fn with_scenario(mut self, scenario_id: ScenarioId) -> Self {
        self.scenario_id = Some(scenario_id);
        self
    }
}

/// Response from AI completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,
    pub model: String,
    pub finish_reason: FinishReason,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Error,
}

/// Provider information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub model: String,
    pub max_context_tokens: u32,
}

impl ProviderInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>, max_context_tokens: u32) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            max_context_tokens,
        }
    }
}

/// AI provider errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AIError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("context too long: {tokens} tokens exceeds {max} limit")]
    ContextTooLong { tokens: u32, max: u32 },

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn context_too_long(tokens: u32, max: u32) -> Self {
        Self::ContextTooLong { tokens, max }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_request_builder_collects_fields() {
        let request = CompletionRequest::new(RequestMetadata::new(RequestPurpose::TurnScore, "t-1"))
            .with_message(MessageRole::User, "Hello")
            .with_system_prompt("Score the turn")
            .with_max_tokens(200)
            .with_temperature(0.0);

        assert_eq!(request.messages, vec![Message::user("Hello")]);
        assert_eq!(request.system_prompt.as_deref(), Some("Score the turn"));
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.metadata.purpose, RequestPurpose::TurnScore);
    }

    #[test]
    fn metadata_builder_attaches_scenario() {
        let metadata = RequestMetadata::new(RequestPurpose::Narrative, "t-2")
            .with_scenario(ScenarioId::new("renewal").unwrap());

        assert_eq!(metadata.trace_id, "t-2");
        assert_eq!(metadata.scenario_id.unwrap().as_str(), "renewal");
    }

    #[test]
    fn token_usage_calculates_total() {
        assert_eq!(TokenUsage::new(100, 50).total_tokens, 150);
    }

    #[test]
    fn retryable_classification() {
        assert!(AIError::rate_limited(30).is_retryable());
        assert!(AIError::unavailable("down").is_retryable());
        assert!(AIError::network("reset").is_retryable());
        assert!(AIError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!AIError::AuthenticationFailed.is_retryable());
        assert!(!AIError::context_too_long(100, 50).is_retryable());
        assert!(!AIError::parse("bad json").is_retryable());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MessageRole::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn purpose_displays_snake_case() {
        assert_eq!(RequestPurpose::CounterpartTurn.to_string(), "counterpart_turn");
    }
}
