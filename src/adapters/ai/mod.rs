//! AI Provider Adapters.
//!
//! - `MockAIProvider` - per-purpose scripted responses, used for demo mode and tests
//! - `OpenAIProvider` - OpenAI chat completions
//! - `AnthropicProvider` - Anthropic messages
//! - `FailoverAIProvider` - primary/fallback wrapper

mod anthropic_provider;
mod failover_provider;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use failover_provider::{FailoverAIProvider, NoFallback};
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};

use std::time::Duration;

use crate::ports::AIError;

/// Exponential backoff between attempts: 1s, 2s, 4s, ...
pub(crate) fn retry_delay(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.min(6))
}

pub(crate) fn map_transport_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Maps a non-success HTTP status to an `AIError`.
pub(crate) fn classify_status(status: u16, body: String, default_retry_after: u32) -> AIError {
    match status {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(parse_retry_after(&body).unwrap_or(default_retry_after)),
        400 => AIError::InvalidRequest(body),
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

/// Extracts N from "... try again in N seconds" in a JSON error body.
fn parse_retry_after(body: &str) -> Option<u32> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?;
    let rest = &message[message.find("try again in ")? + "try again in ".len()..];
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}
