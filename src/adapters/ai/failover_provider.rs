//! Failover AI Provider - primary provider with an optional fallback.
//!
//! Only retryable primary errors (rate limiting, outages, network, timeouts)
//! move the request to the fallback. Authentication and request errors are
//! returned as-is since another vendor would not fix them.

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

pub struct FailoverAIProvider<P: AIProvider, F: AIProvider = NoFallback> {
    primary: P,
    fallback: Option<F>,
}

/// Marker type for when no fallback is configured.
pub struct NoFallback;

#[async_trait]
impl AIProvider for NoFallback {
    async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::unavailable("no fallback provider configured"))
    }

    fn estimate_tokens(&self, _: &str) -> u32 {
        0
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("none", "none", 0)
    }
}

impl<P: AIProvider> FailoverAIProvider<P, NoFallback> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback<F: AIProvider>(self, fallback: F) -> FailoverAIProvider<P, F> {
        FailoverAIProvider {
            primary: self.primary,
            fallback: Some(fallback),
        }
    }
}

#[async_trait]
impl<P: AIProvider + 'static, F: AIProvider + 'static> AIProvider for FailoverAIProvider<P, F> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        match &self.fallback {
            Some(fallback) if err.is_retryable() => {
                tracing::warn!(
                    primary = %self.primary.provider_info().name,
                    fallback = %fallback.provider_info().name,
                    purpose = %request.metadata.purpose,
                    trace_id = %request.metadata.trace_id,
                    "AI provider failover: {}",
                    err
                );
                fallback.complete(request).await
            }
            _ => Err(err),
        }
    }

    fn estimate_tokens(&self, text: &str) -> u32 {
        self.primary.estimate_tokens(text)
    }

    fn provider_info(&self) -> ProviderInfo {
        self.primary.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::{RequestMetadata, RequestPurpose};

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(RequestPurpose::CounterpartTurn, "trace-1"))
            .with_message(crate::ports::MessageRole::User, "Hello")
    }

    fn named(name: &str) -> MockAIProvider {
        MockAIProvider::new().with_provider_info(ProviderInfo::new(name, "m", 1000))
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let primary = named("primary").with_response(RequestPurpose::CounterpartTurn, "from primary");
        let fallback = named("fallback");
        let provider = FailoverAIProvider::new(primary).with_fallback(fallback.clone());

        let response = provider.complete(request()).await.unwrap();

        assert_eq!(response.content, "from primary");
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn retryable_error_uses_fallback() {
        let primary = named("primary").with_error(
            RequestPurpose::CounterpartTurn,
            MockError::Unavailable {
                message: "down".to_string(),
            },
        );
        let fallback =
            named("fallback").with_response(RequestPurpose::CounterpartTurn, "from fallback");
        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let response = provider.complete(request()).await.unwrap();
        assert_eq!(response.content, "from fallback");
    }

    #[tokio::test]
    async fn non_retryable_error_is_returned() {
        let primary = named("primary")
            .with_error(RequestPurpose::CounterpartTurn, MockError::AuthenticationFailed);
        let fallback = named("fallback");
        let provider = FailoverAIProvider::new(primary).with_fallback(fallback.clone());

        let err = provider.complete(request()).await.unwrap_err();

        assert_eq!(err, AIError::AuthenticationFailed);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test]
    async fn without_fallback_returns_primary_error() {
        let primary = named("primary").with_error(
            RequestPurpose::CounterpartTurn,
            MockError::RateLimited { retry_after_secs: 10 },
        );
        let provider = FailoverAIProvider::new(primary);

        assert_eq!(provider.complete(request()).await.unwrap_err(), AIError::rate_limited(10));
    }

    #[test]
    fn reports_primary_info() {
        let provider = FailoverAIProvider::new(named("primary")).with_fallback(named("fallback"));
        assert_eq!(provider.provider_info().name, "primary");
    }
}
