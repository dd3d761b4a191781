//! Integration tests for the engagement flow.
//!
//! These tests drive the orchestrator the way a message gateway would:
//! 1. A detector-scored message arrives for a conversation
//! 2. The persona advances and the policy routes the turn
//! 3. The scripted model answers (or fails) and the reply is shaped
//! 4. The conversation ends and its persona is forgotten
//!
//! Uses the mock provider and fixed randomness so outcomes are deterministic.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use honeypot_engagement::adapters::MockAIProvider;
use honeypot_engagement::application::{EngagementOrchestrator, ProcessTurnCommand};
use honeypot_engagement::domain::engagement::prompts::{EXTRACTION_QUESTIONS, FALLBACK_REPLIES};
use honeypot_engagement::domain::engagement::{
    ConversationMessage, DetectionResult, EngagementMode, EngagementPolicy, EngagementSignals,
    ExitReason, MessageMetadata, Responder, ScamCategory,
};
use honeypot_engagement::domain::foundation::{ConversationId, FixedRandom, SeededRandom};
use honeypot_engagement::domain::persona::EmotionalState;
use honeypot_engagement::ports::AIError;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn orchestrator(provider: MockAIProvider, rng: FixedRandom) -> EngagementOrchestrator {
    EngagementOrchestrator::new(EngagementPolicy::default(), Arc::new(provider), Arc::new(rng))
}

fn bank_scam(confidence: f64) -> DetectionResult {
    DetectionResult::new(confidence)
        .with_pattern("Claims to be from the bank", ScamCategory::Authority)
        .with_pattern("Threatens account block", ScamCategory::Threat)
        .with_pattern("Asks for immediate payment", ScamCategory::Financial)
}

fn conversation(id: &str) -> ConversationId {
    ConversationId::new(id).unwrap()
}

// =============================================================================
// End-to-end scenarios
// =============================================================================

#[tokio::test]
async fn failed_generation_on_first_turn_falls_back_and_continues() {
    let orchestrator = orchestrator(
        MockAIProvider::new().with_error(AIError::unavailable("all models down")),
        FixedRandom::always(),
    );

    let result = orchestrator
        .process_turn(
            "URGENT: your account will be blocked today. Pay Rs 500 now.",
            Vec::new(),
            MessageMetadata::default(),
            bank_scam(0.9),
            None,
        )
        .await;

    assert_eq!(result.engagement_mode, EngagementMode::Aggressive);
    assert_eq!(result.turn_number, 1);
    assert!(FALLBACK_REPLIES.contains(&result.response.as_str()));
    assert_eq!(result.responder, Responder::Fallback);
    assert!(result.should_continue);
    assert!(result.exit_reason.is_none());

    let persona = orchestrator
        .personas()
        .get_or_create(&result.conversation_id)
        .await;
    assert_eq!(persona.engagement_turn(), 1);
    assert_eq!(persona.emotional_state(), EmotionalState::Panicked);
}

#[tokio::test]
async fn multi_turn_conversation_accumulates_persona_state() {
    let orchestrator = orchestrator(
        MockAIProvider::new()
            .with_response("What? Why is my account blocked?")
            .with_response("Okay, I want to fix this.")
            .with_response("I am trying, please wait."),
        FixedRandom::always(),
    );
    let id = conversation("whatsapp:+911234567890");
    let mut history = Vec::new();

    let messages = [
        ("Your account will be blocked", 0.9),
        ("Pay the verification fee", 0.9),
        ("Hurry up", 0.3),
    ];

    let mut results = Vec::new();
    for (text, confidence) in messages {
        let result = orchestrator
            .process_turn(
                text,
                history.clone(),
                MessageMetadata::default(),
                DetectionResult::new(confidence),
                Some(id.clone()),
            )
            .await;
        history.push(ConversationMessage::scammer(text));
        history.push(ConversationMessage::persona(result.response.clone()));
        results.push(result);
    }

    let turns: Vec<u32> = results.iter().map(|r| r.turn_number).collect();
    assert_eq!(turns, vec![1, 2, 3]);

    // First reply already asks about the account, so no probe is added
    assert_eq!(results[0].response, "Oh god, please help! What? Why is my account blocked?");
    // Second reply gets a probe
    assert!(results[1].response.ends_with(EXTRACTION_QUESTIONS[0]));
    // Low confidence calms the persona; calm has no modifier
    assert!(results[2].response.starts_with("I am trying, please wait"));
    assert_eq!(results[2].engagement_mode, EngagementMode::None);

    let persona = orchestrator.personas().get_or_create(&id).await;
    assert_eq!(persona.engagement_turn(), 3);
    assert_eq!(persona.emotional_state(), EmotionalState::Calm);
    assert_eq!(persona.extracted_info_count(), 2);
}

#[tokio::test]
async fn cautious_engagement_stops_at_turn_budget() {
    let orchestrator = orchestrator(MockAIProvider::new(), FixedRandom::never());
    let id = conversation("sms:cautious");

    let mut verdicts = Vec::new();
    for _ in 0..10 {
        let result = orchestrator
            .process(
                ProcessTurnCommand::new("Sir please respond", DetectionResult::new(0.65))
                    .with_conversation_id(id.clone()),
            )
            .await;
        verdicts.push((result.should_continue, result.exit_reason));
    }

    assert!(verdicts[..9].iter().all(|(cont, reason)| *cont && reason.is_none()));
    assert_eq!(
        verdicts[9],
        (false, Some(ExitReason::TurnLimit { max_turns: 10 }))
    );
    assert_eq!(verdicts[9].1.unwrap().to_string(), "Max turns reached (10)");
}

#[tokio::test]
async fn external_signals_end_engagement() {
    let orchestrator = orchestrator(MockAIProvider::new(), FixedRandom::never());

    let result = orchestrator
        .process(
            ProcessTurnCommand::new("Thanks, that's all", bank_scam(0.95)).with_signals(
                EngagementSignals {
                    intelligence_complete: true,
                    scammer_suspicious: true,
                    turns_since_new_info: 0,
                },
            ),
        )
        .await;

    assert!(!result.should_continue);
    assert_eq!(result.exit_reason, Some(ExitReason::IntelligenceComplete));
}

#[tokio::test]
async fn ended_conversation_restarts_from_defaults() {
    let orchestrator = orchestrator(MockAIProvider::new(), FixedRandom::always());
    let id = conversation("telegram:42");

    for _ in 0..3 {
        orchestrator
            .process(ProcessTurnCommand::new("Pay", bank_scam(0.9)).with_conversation_id(id.clone()))
            .await;
    }
    assert!(orchestrator.end_conversation(&id));

    let persona = orchestrator.personas().get_or_create(&id).await;
    assert_eq!(persona.engagement_turn(), 0);
    assert_eq!(persona.extracted_info_count(), 0);
    assert_eq!(persona.emotional_state(), EmotionalState::Calm);

    let result = orchestrator
        .process(ProcessTurnCommand::new("Hello again", bank_scam(0.9)).with_conversation_id(id))
        .await;
    assert_eq!(result.turn_number, 1);
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_turns_for_one_conversation_serialize() {
    let orchestrator = Arc::new(orchestrator(
        MockAIProvider::new().with_delay(Duration::from_millis(10)),
        FixedRandom::never(),
    ));
    let id = conversation("shared");

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let orchestrator = orchestrator.clone();
            let id = id.clone();
            tokio::spawn(async move {
                orchestrator
                    .process(ProcessTurnCommand::new("Pay", bank_scam(0.9)).with_conversation_id(id))
                    .await
                    .turn_number
            })
        })
        .collect();

    let mut turns = HashSet::new();
    for task in tasks {
        turns.insert(task.await.unwrap());
    }

    assert_eq!(turns, (1..=8).collect::<HashSet<u32>>());
    let persona = orchestrator.personas().get_or_create(&id).await;
    assert_eq!(persona.engagement_turn(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_conversations_do_not_wait_on_each_other() {
    let orchestrator = Arc::new(orchestrator(
        MockAIProvider::new().with_delay(Duration::from_millis(200)),
        FixedRandom::never(),
    ));

    let started = std::time::Instant::now();
    let tasks: Vec<_> = (0..6)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move {
                orchestrator
                    .process(
                        ProcessTurnCommand::new("Pay", bank_scam(0.9))
                            .with_conversation_id(conversation(&format!("conv-{i}"))),
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().turn_number, 1);
    }

    // Six serialized calls would take at least 1.2s
    assert!(started.elapsed() < Duration::from_millis(1000));
    assert_eq!(orchestrator.personas().len(), 6);
}

#[tokio::test]
async fn cancelled_turn_releases_conversation() {
    let orchestrator = orchestrator(
        MockAIProvider::new()
            .with_response("slow reply")
            .with_delay(Duration::from_millis(300)),
        FixedRandom::never(),
    );
    let id = conversation("cancelled");

    let cancelled = tokio::time::timeout(
        Duration::from_millis(30),
        orchestrator.process(ProcessTurnCommand::new("Pay", bank_scam(0.9)).with_conversation_id(id.clone())),
    )
    .await;
    assert!(cancelled.is_err());

    // Lock released, and the turn step was applied whole before generation
    let persona = tokio::time::timeout(
        Duration::from_millis(100),
        orchestrator.personas().get_or_create(&id),
    )
    .await
    .expect("persona lock should be free");
    assert_eq!(persona.engagement_turn(), 1);
    assert_eq!(persona.emotional_state(), EmotionalState::Panicked);
}

// =============================================================================
// Randomness
// =============================================================================

#[tokio::test]
async fn seeded_randomness_is_reproducible() {
    async fn run(seed: u64) -> Vec<String> {
        let orchestrator = EngagementOrchestrator::new(
            EngagementPolicy::default(),
            Arc::new(MockAIProvider::new().with_error(AIError::network("down"))
                .with_error(AIError::network("down"))
                .with_error(AIError::network("down"))
                .with_error(AIError::network("down"))),
            Arc::new(SeededRandom::new(seed)),
        );
        let id = conversation("seeded");
        let mut replies = Vec::new();
        for _ in 0..4 {
            replies.push(
                orchestrator
                    .process(ProcessTurnCommand::new("Pay", bank_scam(0.9)).with_conversation_id(id.clone()))
                    .await
                    .response,
            );
        }
        replies
    }

    assert_eq!(run(7).await, run(7).await);
}
