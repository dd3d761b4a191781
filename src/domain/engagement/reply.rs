//! Reply shaping and turn notes.

use super::policy::EngagementMode;
use super::prompts::{EXTRACTION_QUESTIONS, FALLBACK_REPLIES, INTELLIGENCE_KEYWORDS};
use super::values::DetectionResult;
use crate::domain::foundation::{choose, RandomSource};
use crate::domain::persona::PersonaContext;

/// Final reply text plus whether an extraction question was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapedReply {
    pub text: String,
    pub asked_extraction: bool,
}

/// Prefixes the emotional modifier unless this is the opening turn or the
/// text already starts with it.
pub fn apply_emotional_modifier(text: &str, modifier: &str, turn: u32) -> String {
    if turn == 0 || modifier.is_empty() || text.starts_with(modifier) {
        return text.to_string();
    }
    format!("{}{}", modifier, text)
}

/// True if the reply already asks about an account, UPI ID, link or number.
pub fn mentions_intelligence_target(text: &str) -> bool {
    let lower = text.to_lowercase();
    INTELLIGENCE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Appends a question after stripping trailing periods.
pub fn append_question(text: &str, question: &str) -> String {
    format!("{} {}", text.trim_end_matches('.'), question)
}

/// Post-processes generated text for the persona's current context.
pub fn shape_reply(raw: &str, context: &PersonaContext, rng: &dyn RandomSource) -> ShapedReply {
    let mut text = apply_emotional_modifier(
        raw.trim(),
        context.emotional_modifier,
        context.engagement_turn,
    );

    let mut asked_extraction = false;
    if context.should_extract && !mentions_intelligence_target(&text) {
        if let Some(question) = choose(rng, &EXTRACTION_QUESTIONS) {
            text = append_question(&text, question);
            asked_extraction = true;
        }
    }

    ShapedReply {
        text,
        asked_extraction,
    }
}

/// Picks one of the canned replies. Never empty.
pub fn fallback_reply(rng: &dyn RandomSource) -> &'static str {
    choose(rng, &FALLBACK_REPLIES).copied().unwrap_or(FALLBACK_REPLIES[0])
}

/// One-line summary of the turn for operators.
///
/// `Mode: aggressive | Tactics: urgency, financial | Confidence: 92% | Turn: 3 | Persona: panicked`
pub fn turn_notes(
    mode: EngagementMode,
    detection: &DetectionResult,
    turn: u32,
    persona_state: &str,
) -> String {
    let mut parts = vec![format!("Mode: {}", mode)];

    let categories = detection.categories();
    if !categories.is_empty() {
        let tactics: Vec<&str> = categories.iter().map(|c| c.as_str()).collect();
        parts.push(format!("Tactics: {}", tactics.join(", ")));
    }

    parts.push(format!("Confidence: {}", detection.confidence));
    parts.push(format!("Turn: {}", turn));
    parts.push(format!("Persona: {}", persona_state));

    parts.join(" | ")
}
