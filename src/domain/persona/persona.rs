//! Persona - the simulated victim's evolving state for one conversation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::domain::foundation::{Confidence, RandomSource, Timestamp};

/// Intensity above which the persona panics.
const PANIC_INTENSITY: f64 = 0.8;

/// Intensity above which the persona grows anxious.
const ANXIETY_INTENSITY: f64 = 0.5;

const BASE_EXTRACTION_PROBABILITY: f64 = 0.4;
const RAPPORT_BONUS_PER_TURN: f64 = 0.1;
const MAX_RAPPORT_BONUS: f64 = 0.3;
const PENALTY_PER_EXTRACTION: f64 = 0.15;

/// Personality traits the persona presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaTrait {
    Trusting,
    Worried,
    Confused,
    Cooperative,
    TechNaive,
}

impl PersonaTrait {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaTrait::Trusting => "trusting",
            PersonaTrait::Worried => "worried",
            PersonaTrait::Confused => "confused",
            PersonaTrait::Cooperative => "cooperative",
            PersonaTrait::TechNaive => "tech_naive",
        }
    }
}

/// Current emotional state of the persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionalState {
    #[default]
    Calm,
    Anxious,
    Panicked,
    Relieved,
    /// Only ever set deliberately, late in a conversation.
    Suspicious,
}

impl EmotionalState {
    /// Maps scam intensity onto calm, anxious or panicked.
    ///
    /// `Relieved` and `Suspicious` are never produced here; they must be
    /// set explicitly through [`Persona::set_emotional_state`].
    pub fn from_intensity(intensity: Confidence) -> Self {
        let value = intensity.value();
        if value > PANIC_INTENSITY {
            EmotionalState::Panicked
        } else if value > ANXIETY_INTENSITY {
            EmotionalState::Anxious
        } else {
            EmotionalState::Calm
        }
    }

    /// Short prefix prepended to replies in this state.
    pub fn modifier(&self) -> &'static str {
        match self {
            EmotionalState::Calm => "",
            EmotionalState::Anxious => "I'm getting worried... ",
            EmotionalState::Panicked => "Oh god, please help! ",
            EmotionalState::Relieved => "Thank goodness... ",
            EmotionalState::Suspicious => "Hmm, ",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionalState::Calm => "calm",
            EmotionalState::Anxious => "anxious",
            EmotionalState::Panicked => "panicked",
            EmotionalState::Relieved => "relieved",
            EmotionalState::Suspicious => "suspicious",
        }
    }
}

impl fmt::Display for EmotionalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The honeypot's simulated victim for a single conversation.
///
/// Counters only move forward; the only way back to a fresh persona is to
/// drop it from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    traits: Vec<PersonaTrait>,
    emotional_state: EmotionalState,
    engagement_turn: u32,
    extracted_info_count: u32,
    claimed_issues: Vec<String>,
    mentioned_details: HashMap<String, serde_json::Value>,
    started_at: Timestamp,
}

impl Persona {
    /// Creates a fresh persona: trusting, worried, tech-naive and calm.
    pub fn new() -> Self {
        Self {
            traits: vec![
                PersonaTrait::Trusting,
                PersonaTrait::Worried,
                PersonaTrait::TechNaive,
            ],
            emotional_state: EmotionalState::Calm,
            engagement_turn: 0,
            extracted_info_count: 0,
            claimed_issues: Vec::new(),
            mentioned_details: HashMap::new(),
            started_at: Timestamp::now(),
        }
    }

    pub fn traits(&self) -> &[PersonaTrait] {
        &self.traits
    }

    pub fn emotional_state(&self) -> EmotionalState {
        self.emotional_state
    }

    pub fn engagement_turn(&self) -> u32 {
        self.engagement_turn
    }

    pub fn extracted_info_count(&self) -> u32 {
        self.extracted_info_count
    }

    /// Fabricated victim claims, oldest first.
    pub fn claimed_issues(&self) -> &[String] {
        &self.claimed_issues
    }

    pub fn mentioned_details(&self) -> &HashMap<String, serde_json::Value> {
        &self.mentioned_details
    }

    pub fn detail(&self, key: &str) -> Option<&serde_json::Value> {
        self.mentioned_details.get(key)
    }

    /// When the conversation started, i.e. when this persona was created.
    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Seconds since the conversation started.
    pub fn conversation_age_secs(&self) -> u64 {
        self.started_at.elapsed_secs()
    }

    /// Applies one processed turn: bumps the turn counter, re-derives the
    /// emotional state from `intensity`, and optionally counts an extraction.
    pub fn advance(&mut self, intensity: Confidence, extracted_something: bool) {
        self.increment_turn();
        self.update_emotional_state(intensity);
        if extracted_something {
            self.record_extraction();
        }
    }

    pub fn increment_turn(&mut self) {
        self.engagement_turn = self.engagement_turn.saturating_add(1);
    }

    pub fn update_emotional_state(&mut self, intensity: Confidence) {
        self.emotional_state = EmotionalState::from_intensity(intensity);
    }

    /// Forces a state, including ones intensity never yields.
    pub fn set_emotional_state(&mut self, state: EmotionalState) {
        self.emotional_state = state;
    }

    pub fn record_extraction(&mut self) {
        self.extracted_info_count = self.extracted_info_count.saturating_add(1);
    }

    pub fn remember_claim(&mut self, issue: impl Into<String>) {
        self.claimed_issues.push(issue.into());
    }

    /// Stores a detail, overwriting any previous value for the key.
    pub fn remember_detail(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.mentioned_details.insert(key.into(), value);
    }

    pub fn emotional_modifier(&self) -> &'static str {
        self.emotional_state.modifier()
    }

    /// Probability of probing for intelligence this turn.
    ///
    /// Rises with rapport (capped after three turns) and falls with every
    /// extraction already made; clamped to [0, 1].
    pub fn extraction_probability(&self) -> f64 {
        let rapport =
            (f64::from(self.engagement_turn) * RAPPORT_BONUS_PER_TURN).min(MAX_RAPPORT_BONUS);
        let penalty = f64::from(self.extracted_info_count) * PENALTY_PER_EXTRACTION;

        (BASE_EXTRACTION_PROBABILITY + rapport - penalty).clamp(0.0, 1.0)
    }

    pub fn should_ask_extraction_question(&self, rng: &dyn RandomSource) -> bool {
        rng.chance(self.extraction_probability())
    }

    /// Snapshot used when parameterizing a prompt.
    pub fn context(&self, rng: &dyn RandomSource) -> PersonaContext {
        PersonaContext {
            emotional_state: self.emotional_state,
            engagement_turn: self.engagement_turn,
            emotional_modifier: self.emotional_modifier(),
            should_extract: self.should_ask_extraction_question(rng),
        }
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::new()
    }
}

/// Persona facts handed to prompt construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaContext {
    pub emotional_state: EmotionalState,
    pub engagement_turn: u32,
    pub emotional_modifier: &'static str,
    pub should_extract: bool,
}
