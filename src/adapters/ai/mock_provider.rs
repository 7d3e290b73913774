//! Mock AI Provider for testing.
//!
//! Responses are queued per [`RequestPurpose`]. The session engine runs
//! scoring, goal checks and the counterpart reply concurrently, so a single
//! FIFO queue would hand answers to the wrong caller.
//!
//! ```ignore
//! let provider = MockAIProvider::new()
//!     .with_response(RequestPurpose::TurnScore, r#"{"score": 80, "tips": ["Nice"]}"#)
//!     .with_response(RequestPurpose::CounterpartTurn, "Tell me more.");
//! ```

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestPurpose, TokenUsage,
};

/// A configured mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AIError::unavailable(message),
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Network { message } => AIError::network(message),
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// Mock AI provider with per-purpose response queues.
#[derive(Debug, Clone)]
pub struct MockAIProvider {
    responses: Arc<Mutex<HashMap<RequestPurpose, VecDeque<MockResponse>>>>,
    info: ProviderInfo,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAIProvider {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            info: ProviderInfo::new("mock", "mock-model-1", 128_000),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful completion for requests with `purpose`.
    pub fn with_response(self, purpose: RequestPurpose, content: impl Into<String>) -> Self {
        self.push(purpose, MockResponse::Success(content.into()));
        self
    }

    /// Queues an error for requests with `purpose`.
    pub fn with_error(self, purpose: RequestPurpose, error: MockError) -> Self {
        self.push(purpose, MockResponse::Error(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    fn push(&self, purpose: RequestPurpose, response: MockResponse) {
        self.responses
            .lock()
            .unwrap()
            .entry(purpose)
            .or_default()
            .push_back(response);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of recorded calls made for `purpose`.
    pub fn calls_for(&self, purpose: RequestPurpose) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.metadata.purpose == purpose)
            .count()
    }

    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self, purpose: RequestPurpose) -> MockResponse {
        self.responses
            .lock()
            .unwrap()
            .get_mut(&purpose)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| MockResponse::Success(Self::default_content(purpose).to_string()))
    }

    /// Canned output for an empty queue, shaped the way each purpose expects.
    fn default_content(purpose: RequestPurpose) -> &'static str {
        match purpose {
            RequestPurpose::CounterpartTurn => "I see. Can you tell me a bit more about that?",
            RequestPurpose::TurnScore => {
                r#"{"score": 65, "tips": ["Tie your answer back to their priorities"]}"#
            }
            RequestPurpose::GoalCheck => "NO",
            RequestPurpose::Narrative => "Solid effort. Keep practising discovery questions.",
        }
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let purpose = request.metadata.purpose;
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_response(purpose) {
            MockResponse::Success(content) => Ok(CompletionResponse {
                usage: TokenUsage::new(10, self.estimate_tokens(&content)),
                content,
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockResponse::Error(err) => Err(err.into()),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        (text.len() / 4).max(1) as u32
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
