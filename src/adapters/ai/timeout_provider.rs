//! Timeout AI Provider - bounds how long one completion may take.
//!
//! A call that overruns is abandoned and reported as `AIError::Timeout`,
//! which the engagement core handles like any other generation failure.

use async_trait::async_trait;
use std::time::Duration;

use crate::ports::{AIError, AIProvider, CompletionRequest, CompletionResponse, ProviderInfo};

/// Wraps a provider with a per-call deadline.
#[derive(Debug, Clone)]
pub struct TimeoutAIProvider<P: AIProvider> {
    inner: P,
    timeout: Duration,
}

impl<P: AIProvider> TimeoutAIProvider<P> {
    pub fn new(inner: P, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<P: AIProvider + 'static> AIProvider for TimeoutAIProvider<P> {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let conversation_id = request.metadata.conversation_id.clone();

        match tokio::time::timeout(self.timeout, self.inner.complete(request)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    conversation_id = %conversation_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    model = %self.inner.provider_info().model,
                    "Completion timed out"
                );
                Err(AIError::Timeout {
                    timeout_secs: self.timeout.as_secs(),
                })
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.inner.provider_info()
    }
}
