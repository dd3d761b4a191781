//! Failover AI Provider - primary model first, fallback model second.
//!
//! Any failure of the primary (error or blank text) moves on to the
//! fallback if one is configured. Callers see a single call that either
//! produced usable text or did not.
//!
//! # Example
//!
//! ```ignore
//! let provider = FailoverAIProvider::new(gemini_pro_preview)
//!     .with_fallback(gemini_pro);
//! ```

use async_trait::async_trait;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// AI provider wrapper with automatic failover.
pub struct FailoverAIProvider<P: AIProvider, F: AIProvider = NoFallback> {
    primary: P,
    fallback: Option<F>,
}

/// Marker type for when no fallback is configured.
#[derive(Debug, Clone, Copy)]
pub struct NoFallback;

#[async_trait]
impl AIProvider for NoFallback {
    async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, AIError> {
        Err(AIError::unavailable("no fallback model configured"))
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("none", "none")
    }
}

impl<P: AIProvider> FailoverAIProvider<P, NoFallback> {
    /// Creates a failover provider with only a primary provider.
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback<F: AIProvider>(self, fallback: F) -> FailoverAIProvider<P, F> {
        FailoverAIProvider {
            primary: self.primary,
            fallback: Some(fallback),
        }
    }
}

impl<P: AIProvider, F: AIProvider> FailoverAIProvider<P, F> {
    /// Builds from an optional fallback, as configuration supplies it.
    pub fn with_optional_fallback(primary: P, fallback: Option<F>) -> Self {
        Self { primary, fallback }
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Treats a blank completion as a failure of the model that produced it.
async fn attempt<T: AIProvider + ?Sized>(
    provider: &T,
    request: CompletionRequest,
) -> Result<CompletionResponse, AIError> {
    let response = provider.complete(request).await?;
    if response.is_blank() {
        return Err(AIError::empty_response(response.model));
    }
    Ok(response)
}

#[async_trait]
impl<P: AIProvider + 'static, F: AIProvider + 'static> AIProvider for FailoverAIProvider<P, F> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let fallback = match &self.fallback {
            Some(fallback) => fallback,
            None => return attempt(&self.primary, request).await,
        };

        match attempt(&self.primary, request.clone()).await {
            Ok(response) => Ok(response),
            Err(err) => {
                tracing::warn!(
                    conversation_id = %request.metadata.conversation_id,
                    trace_id = %request.metadata.trace_id,
                    primary = %self.primary.provider_info().model,
                    fallback = %fallback.provider_info().model,
                    error = %err,
                    "Primary model failed, trying fallback"
                );
                attempt(fallback, request).await
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        // Report primary provider's info
        self.primary.provider_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::foundation::ConversationId;
    use crate::ports::{MessageRole, RequestMetadata};

    fn make_request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(ConversationId::generate(), "trace-123"))
            .with_message(MessageRole::User, "Send the fee now")
    }

    #[tokio::test]
    async fn primary_success_no_fallback_used() {
        let primary = MockAIProvider::for_model("primary").with_response("Which fee?");
        let fallback = MockAIProvider::for_model("fallback").with_response("Fallback");
        let fallback_probe = fallback.clone();

        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let response = provider.complete(make_request()).await.unwrap();

        assert_eq!(response.content, "Which fee?");
        assert_eq!(response.model, "primary");
        assert_eq!(fallback_probe.call_count(), 0);
    }

    #[tokio::test]
    async fn primary_rate_limited_uses_fallback() {
        let primary = MockAIProvider::for_model("primary").with_error(AIError::rate_limited(30));
        let fallback = MockAIProvider::for_model("fallback").with_response("Fallback response");

        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let response = provider.complete(make_request()).await.unwrap();

        assert_eq!(response.content, "Fallback response");
        assert_eq!(response.model, "fallback");
    }

    #[tokio::test]
    async fn non_retryable_error_still_falls_back() {
        let primary = MockAIProvider::new().with_error(AIError::content_filtered("safety"));
        let fallback = MockAIProvider::new().with_response("Fallback response");

        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let response = provider.complete(make_request()).await.unwrap();
        assert_eq!(response.content, "Fallback response");
    }

    #[tokio::test]
    async fn blank_primary_uses_fallback() {
        let primary = MockAIProvider::new().with_empty_response();
        let fallback = MockAIProvider::new().with_response("Is this the bank?");

        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let response = provider.complete(make_request()).await.unwrap();
        assert_eq!(response.content, "Is this the bank?");
    }

    #[tokio::test]
    async fn no_fallback_configured_returns_error() {
        let primary = MockAIProvider::new().with_error(AIError::rate_limited(30));

        let provider = FailoverAIProvider::new(primary);

        let err = provider.complete(make_request()).await.unwrap_err();
        assert_eq!(err, AIError::rate_limited(30));
    }

    #[tokio::test]
    async fn blank_without_fallback_is_empty_response_error() {
        let provider = FailoverAIProvider::new(MockAIProvider::for_model("solo").with_empty_response());

        let err = provider.complete(make_request()).await.unwrap_err();
        assert_eq!(err, AIError::empty_response("solo"));
    }

    #[tokio::test]
    async fn fallback_also_fails_returns_fallback_error() {
        let primary = MockAIProvider::new().with_error(AIError::rate_limited(30));
        let fallback = MockAIProvider::new().with_error(AIError::AuthenticationFailed);

        let provider = FailoverAIProvider::new(primary).with_fallback(fallback);

        let err = provider.complete(make_request()).await.unwrap_err();
        assert_eq!(err, AIError::AuthenticationFailed);
    }

    #[tokio::test]
    async fn optional_fallback_absent_behaves_like_primary_only() {
        let provider = FailoverAIProvider::with_optional_fallback(
            MockAIProvider::new().with_error(AIError::network("reset")),
            None::<MockAIProvider>,
        );

        assert!(!provider.has_fallback());
        assert!(provider.complete(make_request()).await.is_err());
    }

    #[test]
    fn reports_primary_info() {
        let provider = FailoverAIProvider::new(MockAIProvider::for_model("gemini-3-pro-preview"))
            .with_fallback(MockAIProvider::for_model("gemini-2.5-pro"));

        assert_eq!(provider.provider_info().model, "gemini-3-pro-preview");
    }
}
