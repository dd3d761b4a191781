//! EngagementOrchestrator - the entry points callers use per conversation.
//!
//! Owns the persona store for the life of the service and routes turns and
//! conversation endings to their handlers.

use std::sync::Arc;

use super::handlers::{
    EndConversationCommand, EndConversationHandler, GenerationSettings, ProcessTurnCommand,
    ProcessTurnHandler,
};
use crate::adapters::ai::{FailoverAIProvider, TimeoutAIProvider};
use crate::config::{AppConfig, ValidationError};
use crate::domain::engagement::{
    ConversationMessage, DetectionResult, EngagementPolicy, EngagementResult, MessageMetadata,
    PolicyError,
};
use crate::domain::foundation::{ConversationId, RandomSource, ThreadRandom};
use crate::domain::persona::PersonaStore;
use crate::ports::AIProvider;

/// Errors building an orchestrator from configuration
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ValidationError),

    #[error("Invalid engagement policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Facade over the engagement handlers
pub struct EngagementOrchestrator {
    personas: Arc<PersonaStore>,
    process_turn: ProcessTurnHandler<dyn AIProvider>,
    end_conversation: EndConversationHandler,
}

impl EngagementOrchestrator {
    /// Creates an orchestrator with a fresh persona store.
    pub fn new(
        policy: EngagementPolicy,
        ai_provider: Arc<dyn AIProvider>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self::with_generation(policy, ai_provider, rng, GenerationSettings::default())
    }

    fn with_generation(
        policy: EngagementPolicy,
        ai_provider: Arc<dyn AIProvider>,
        rng: Arc<dyn RandomSource>,
        generation: GenerationSettings,
    ) -> Self {
        let personas = Arc::new(PersonaStore::new());
        Self {
            process_turn: ProcessTurnHandler::new(personas.clone(), policy, ai_provider, rng)
                .with_generation(generation),
            end_conversation: EndConversationHandler::new(personas.clone()),
            personas,
        }
    }

    /// Builds from validated configuration.
    ///
    /// Each model gets the configured timeout; the fallback model is only
    /// wired in when one is configured and a provider for it is supplied.
    pub fn from_config(
        config: &AppConfig,
        primary: Arc<dyn AIProvider>,
        fallback: Option<Arc<dyn AIProvider>>,
    ) -> Result<Self, OrchestratorError> {
        config.validate()?;
        let policy = EngagementPolicy::new(config.engagement.thresholds())?;

        let timeout = config.ai.timeout();
        let fallback = fallback
            .filter(|_| config.ai.fallback_model().is_some())
            .map(|provider| TimeoutAIProvider::new(provider, timeout));
        let provider = FailoverAIProvider::with_optional_fallback(
            TimeoutAIProvider::new(primary, timeout),
            fallback,
        );

        tracing::info!(
            models = ?config.ai.model_chain(),
            failover = provider.has_fallback(),
            timeout_secs = config.ai.timeout_secs,
            "Engagement orchestrator configured"
        );

        Ok(Self::with_generation(
            policy,
            Arc::new(provider),
            Arc::new(ThreadRandom),
            GenerationSettings {
                max_tokens: config.ai.max_output_tokens,
                temperature: config.ai.temperature,
            },
        ))
    }

    /// Processes one incoming message and returns the persona's reply.
    pub async fn process_turn(
        &self,
        message: impl Into<String>,
        history: Vec<ConversationMessage>,
        metadata: MessageMetadata,
        detection: DetectionResult,
        conversation_id: Option<ConversationId>,
    ) -> EngagementResult {
        let mut cmd = ProcessTurnCommand::new(message, detection)
            .with_history(history)
            .with_metadata(metadata);
        cmd.conversation_id = conversation_id;
        self.process(cmd).await
    }

    /// Processes a fully specified turn, including external exit signals.
    pub async fn process(&self, cmd: ProcessTurnCommand) -> EngagementResult {
        self.process_turn.handle(cmd).await
    }

    /// Forgets a conversation's persona. Must be called when it concludes.
    pub fn end_conversation(&self, conversation_id: &ConversationId) -> bool {
        self.end_conversation.handle(EndConversationCommand {
            conversation_id: conversation_id.clone(),
        })
    }

    pub fn personas(&self) -> &Arc<PersonaStore> {
        &self.personas
    }

    /// Drops all persona state. Returns how many conversations were live.
    pub fn shutdown(&self) -> usize {
        self.personas.shutdown()
    }
}
