//! ProcessTurnHandler - Answer one scammer message in character

use std::sync::Arc;
use std::time::Instant;

use crate::domain::engagement::prompts::{system_prompt, turn_prompt, MAX_INDICATORS};
use crate::domain::engagement::reply::{fallback_reply, shape_reply, turn_notes};
use crate::domain::engagement::{
    ConversationMessage, DetectionResult, EngagementPolicy, EngagementResult, EngagementSignals,
    EngagementState, MessageMetadata, Responder,
};
use crate::domain::foundation::{ConversationId, RandomSource};
use crate::domain::persona::{Persona, PersonaContext, PersonaStore};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Indicator placeholder for the system framing; the turn prompt lists them.
const SYSTEM_INDICATORS: &str = "See conversation context";

/// Command to process one incoming scammer message
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub message: String,
    /// Prior messages, oldest first.
    pub history: Vec<ConversationMessage>,
    pub metadata: MessageMetadata,
    pub detection: DetectionResult,
    /// Generated when absent.
    pub conversation_id: Option<ConversationId>,
    pub signals: EngagementSignals,
}

impl ProcessTurnCommand {
    pub fn new(message: impl Into<String>, detection: DetectionResult) -> Self {
        Self {
            message: message.into(),
            history: Vec::new(),
            metadata: MessageMetadata::default(),
            detection,
            conversation_id: None,
            signals: EngagementSignals::default(),
        }
    }

    pub fn with_history(mut self, history: Vec<ConversationMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_conversation_id(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    pub fn with_signals(mut self, signals: EngagementSignals) -> Self {
        self.signals = signals;
        self
    }
}

/// Sampling parameters passed on every completion request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.9,
        }
    }
}

/// Handler for engagement turns
///
/// Never fails: generation problems are logged and answered with a canned
/// in-character reply.
pub struct ProcessTurnHandler<P: ?Sized + AIProvider> {
    personas: Arc<PersonaStore>,
    policy: EngagementPolicy,
    ai_provider: Arc<P>,
    rng: Arc<dyn RandomSource>,
    generation: GenerationSettings,
}

impl<P: ?Sized + AIProvider> ProcessTurnHandler<P> {
    pub fn new(
        personas: Arc<PersonaStore>,
        policy: EngagementPolicy,
        ai_provider: Arc<P>,
        rng: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            personas,
            policy,
            ai_provider,
            rng,
            generation: GenerationSettings::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub async fn handle(&self, cmd: ProcessTurnCommand) -> EngagementResult {
        let started = Instant::now();
        let conversation_id = cmd
            .conversation_id
            .clone()
            .unwrap_or_else(ConversationId::generate);
        let confidence = cmd.detection.confidence;

        // 1. Hold the persona for the whole turn
        let mut persona = self.personas.checkout(&conversation_id).await;

        // 2. Advance turn and emotional state as one step
        persona.advance(confidence, false);
        let turn = persona.engagement_turn();

        // 3. Route by confidence
        let mode = self.policy.engagement_mode(confidence);
        if !mode.is_engaging() {
            tracing::debug!(
                conversation_id = %conversation_id,
                confidence = confidence.value(),
                "Confidence below engagement threshold"
            );
        }

        tracing::info!(
            conversation_id = %conversation_id,
            confidence = confidence.value(),
            mode = %mode,
            turn,
            channel = cmd.metadata.channel.as_deref().unwrap_or("unknown"),
            "Processing engagement turn"
        );

        // 4. Generate and shape the reply
        let context = persona.context(self.rng.as_ref());
        let request = self.build_request(&cmd, &conversation_id, &context);
        let (response, responder) = self
            .generate_reply(request, &context, &mut persona, &conversation_id)
            .await;

        // 5. Decide whether to keep going
        let state = EngagementState::new(mode, turn, persona.conversation_age_secs())
            .with_signals(cmd.signals);
        let exit_reason = self.policy.exit_reason(&state);
        let should_continue = exit_reason.is_none();

        let notes = turn_notes(
            mode,
            &cmd.detection,
            turn,
            persona.emotional_state().as_str(),
        );

        match &exit_reason {
            Some(reason) => tracing::info!(
                conversation_id = %conversation_id,
                turn,
                mode = %mode,
                reason = %reason,
                "Engagement should stop"
            ),
            None => tracing::info!(
                conversation_id = %conversation_id,
                turn,
                mode = %mode,
                fallback = responder.is_fallback(),
                "Engagement turn complete"
            ),
        }

        EngagementResult {
            response,
            duration_secs: started.elapsed().as_secs(),
            notes,
            conversation_id,
            turn_number: turn,
            engagement_mode: mode,
            should_continue,
            exit_reason,
            responder,
        }
    }

    /// Build the completion request for this turn
    fn build_request(
        &self,
        cmd: &ProcessTurnCommand,
        conversation_id: &ConversationId,
        context: &PersonaContext,
    ) -> CompletionRequest {
        let indicators = cmd.detection.indicator_descriptions(MAX_INDICATORS);
        let prompt = turn_prompt(
            &cmd.message,
            &cmd.history,
            &indicators,
            context.emotional_state,
            context.engagement_turn,
        );

        let metadata = RequestMetadata::new(
            conversation_id.clone(),
            uuid::Uuid::new_v4().to_string(),
        );

        CompletionRequest::new(metadata)
            .with_system_prompt(system_prompt(
                context.emotional_state,
                context.engagement_turn,
                SYSTEM_INDICATORS,
            ))
            .with_max_tokens(self.generation.max_tokens)
            .with_temperature(self.generation.temperature)
            .with_message(MessageRole::User, prompt)
    }

    /// Call the provider, falling back to a canned reply on any failure
    async fn generate_reply(
        &self,
        request: CompletionRequest,
        context: &PersonaContext,
        persona: &mut Persona,
        conversation_id: &ConversationId,
    ) -> (String, Responder) {
        let failure = match self.ai_provider.complete(request).await {
            Ok(response) if !response.is_blank() => {
                let shaped = shape_reply(&response.content, context, self.rng.as_ref());
                if shaped.asked_extraction {
                    persona.record_extraction();
                    tracing::debug!(
                        conversation_id = %conversation_id,
                        extracted = persona.extracted_info_count(),
                        "Appended extraction question"
                    );
                }
                return (shaped.text, Responder::Model(response.model));
            }
            Ok(response) => format!("empty response from {}", response.model),
            Err(err) => err.to_string(),
        };

        tracing::warn!(
            conversation_id = %conversation_id,
            error = %failure,
            "Text generation failed, using fallback reply"
        );
        (
            fallback_reply(self.rng.as_ref()).to_string(),
            Responder::Fallback,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAIProvider;
    use crate::domain::engagement::prompts::{EXTRACTION_QUESTIONS, FALLBACK_REPLIES};
    use crate::domain::engagement::{EngagementMode, ExitReason, ScamCategory};
    use crate::domain::foundation::FixedRandom;
    use crate::domain::persona::EmotionalState;
    use crate::ports::AIError;

    fn handler_with(
        provider: MockAIProvider,
        rng: FixedRandom,
    ) -> (ProcessTurnHandler<MockAIProvider>, Arc<PersonaStore>, Arc<MockAIProvider>) {
        let personas = Arc::new(PersonaStore::new());
        let provider = Arc::new(provider);
        let handler = ProcessTurnHandler::new(
            personas.clone(),
            EngagementPolicy::default(),
            provider.clone(),
            Arc::new(rng),
        );
        (handler, personas, provider)
    }

    fn detection(confidence: f64) -> DetectionResult {
        DetectionResult::new(confidence)
            .with_pattern("Account suspension threat", ScamCategory::Threat)
            .with_pattern("Immediate payment demand", ScamCategory::Urgency)
    }

    #[tokio::test]
    async fn test_first_turn_uses_model_reply() {
        let (handler, personas, _) = handler_with(
            MockAIProvider::for_model("gemini-3-pro-preview")
                .with_response("Oh no, which account is blocked?"),
            FixedRandom::always(),
        );
        let id = ConversationId::new("conv-1").unwrap();

        let result = handler
            .handle(ProcessTurnCommand::new("Your account is blocked", detection(0.9))
                .with_conversation_id(id.clone()))
            .await;

        assert_eq!(result.turn_number, 1);
        assert_eq!(result.engagement_mode, EngagementMode::Aggressive);
        assert_eq!(
            result.response,
            "Oh god, please help! Oh no, which account is blocked?"
        );
        assert_eq!(result.responder, Responder::Model("gemini-3-pro-preview".into()));
        assert!(result.should_continue);
        assert!(result.exit_reason.is_none());
        assert_eq!(result.conversation_id, id);

        let persona = personas.get_or_create(&id).await;
        assert_eq!(persona.engagement_turn(), 1);
        assert_eq!(persona.emotional_state(), EmotionalState::Panicked);
        assert_eq!(persona.extracted_info_count(), 0);
    }

    #[tokio::test]
    async fn test_extraction_question_recorded() {
        let (handler, personas, _) = handler_with(
            MockAIProvider::new().with_response("I am scared, what should I do."),
            FixedRandom::always().with_slot(2),
        );
        let id = ConversationId::new("conv-2").unwrap();

        let result = handler
            .handle(ProcessTurnCommand::new("Pay now", detection(0.7))
                .with_conversation_id(id.clone()))
            .await;

        assert!(result.response.ends_with(EXTRACTION_QUESTIONS[2]));
        assert!(result
            .response
            .starts_with("I'm getting worried... I am scared, what should I do "));
        assert_eq!(personas.get_or_create(&id).await.extracted_info_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_uses_fallback() {
        let (handler, personas, _) = handler_with(
            MockAIProvider::new().with_error(AIError::unavailable("quota exhausted")),
            FixedRandom::always(),
        );
        let id = ConversationId::new("conv-3").unwrap();

        let result = handler
            .handle(ProcessTurnCommand::new("Send OTP", detection(0.9))
                .with_conversation_id(id.clone()))
            .await;

        assert!(FALLBACK_REPLIES.contains(&result.response.as_str()));
        assert_eq!(result.responder, Responder::Fallback);
        assert_eq!(result.turn_number, 1);
        assert!(result.should_continue);
        assert_eq!(personas.get_or_create(&id).await.extracted_info_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_reply_uses_fallback() {
        let (handler, _, _) = handler_with(
            MockAIProvider::new().with_empty_response(),
            FixedRandom::never().with_slot(3),
        );

        let result = handler
            .handle(ProcessTurnCommand::new("Hello", detection(0.9)))
            .await;

        assert_eq!(result.response, FALLBACK_REPLIES[3]);
        assert!(result.responder.is_fallback());
    }

    #[tokio::test]
    async fn test_generates_conversation_id_when_absent() {
        let (handler, personas, _) = handler_with(MockAIProvider::new(), FixedRandom::never());

        let result = handler
            .handle(ProcessTurnCommand::new("Hi", detection(0.9)))
            .await;

        assert!(!result.conversation_id.as_str().is_empty());
        assert!(personas.contains(&result.conversation_id));
    }

    #[tokio::test]
    async fn test_turn_limit_stops_engagement() {
        let (handler, _, _) = handler_with(MockAIProvider::new(), FixedRandom::never());
        let id = ConversationId::new("conv-limit").unwrap();

        let mut last = None;
        for _ in 0..10 {
            last = Some(
                handler
                    .handle(ProcessTurnCommand::new("Pay", detection(0.7))
                        .with_conversation_id(id.clone()))
                    .await,
            );
        }

        let last = last.unwrap();
        assert_eq!(last.turn_number, 10);
        assert!(!last.should_continue);
        assert_eq!(last.exit_reason, Some(ExitReason::TurnLimit { max_turns: 10 }));
    }

    #[tokio::test]
    async fn test_signals_drive_exit_reason() {
        let (handler, _, _) = handler_with(MockAIProvider::new(), FixedRandom::never());

        let result = handler
            .handle(ProcessTurnCommand::new("Why so many questions?", detection(0.9))
                .with_signals(EngagementSignals {
                    scammer_suspicious: true,
                    ..Default::default()
                }))
            .await;

        assert!(!result.should_continue);
        assert_eq!(result.exit_reason, Some(ExitReason::ScammerSuspicious));
    }

    #[tokio::test]
    async fn test_request_carries_prompt_and_settings() {
        let (handler, _, provider) = handler_with(MockAIProvider::new(), FixedRandom::never());
        let handler = handler.with_generation(GenerationSettings {
            max_tokens: 256,
            temperature: 0.5,
        });

        handler
            .handle(ProcessTurnCommand::new("Click bit.ly/xyz", detection(0.9))
                .with_history(vec![ConversationMessage::scammer("Hello sir")]))
            .await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.5));
        assert!(request
            .system_prompt
            .as_deref()
            .unwrap_or_default()
            .contains("Emotional state: panicked"));

        let prompt = request.last_user_message().unwrap();
        assert!(prompt.contains("[SCAMMER]: Hello sir"));
        assert!(prompt.contains("\"Click bit.ly/xyz\""));
        assert!(prompt.contains("Account suspension threat, Immediate payment demand"));
    }

    #[tokio::test]
    async fn test_notes_summarize_turn() {
        let (handler, _, _) = handler_with(MockAIProvider::new(), FixedRandom::never());

        let result = handler
            .handle(ProcessTurnCommand::new("Pay", detection(0.92)))
            .await;

        assert_eq!(
            result.notes,
            "Mode: aggressive | Tactics: threat, urgency | Confidence: 92% | Turn: 1 | Persona: panicked"
        );
    }

    #[tokio::test]
    async fn test_low_confidence_reports_mode_none() {
        let (handler, _, _) = handler_with(MockAIProvider::new(), FixedRandom::never());

        let result = handler
            .handle(ProcessTurnCommand::new("Hi, how are you?", DetectionResult::new(0.2)))
            .await;

        assert_eq!(result.engagement_mode, EngagementMode::None);
        assert!(result.should_continue);
    }
}
