//! Value objects exchanged with callers and collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::policy::{EngagementMode, ExitReason};
use crate::domain::foundation::{Confidence, ConversationId, Timestamp};

/// Who wrote a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    /// The suspected scammer.
    Scammer,
    /// The honeypot persona.
    User,
}

/// One message of a conversation, incoming or historical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub sender: SenderType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
}

impl ConversationMessage {
    pub fn new(sender: SenderType, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            timestamp: None,
        }
    }

    /// A message from the suspected scammer.
    pub fn scammer(text: impl Into<String>) -> Self {
        Self::new(SenderType::Scammer, text)
    }

    /// A message the persona sent.
    pub fn persona(text: impl Into<String>) -> Self {
        Self::new(SenderType::User, text)
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Transport metadata accompanying a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Scam tactic family reported by the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamCategory {
    Urgency,
    Authority,
    Financial,
    Threat,
    Phishing,
    Other,
}

impl ScamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::Urgency => "urgency",
            ScamCategory::Authority => "authority",
            ScamCategory::Financial => "financial",
            ScamCategory::Threat => "threat",
            ScamCategory::Phishing => "phishing",
            ScamCategory::Other => "other",
        }
    }
}

impl fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detector rule that fired on the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPattern {
    pub description: String,
    pub category: ScamCategory,
}

impl MatchedPattern {
    pub fn new(description: impl Into<String>, category: ScamCategory) -> Self {
        Self {
            description: description.into(),
            category,
        }
    }
}

/// Output of the external scam detector, consumed read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub confidence: Confidence,
    #[serde(default)]
    pub matched_patterns: Vec<MatchedPattern>,
}

impl DetectionResult {
    pub fn new(confidence: impl Into<Confidence>) -> Self {
        Self {
            confidence: confidence.into(),
            matched_patterns: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, description: impl Into<String>, category: ScamCategory) -> Self {
        self.matched_patterns
            .push(MatchedPattern::new(description, category));
        self
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<ScamCategory> {
        let mut seen = Vec::new();
        for pattern in &self.matched_patterns {
            if !seen.contains(&pattern.category) {
                seen.push(pattern.category);
            }
        }
        seen
    }

    /// Descriptions of the first `limit` matched patterns.
    pub fn indicator_descriptions(&self, limit: usize) -> Vec<&str> {
        self.matched_patterns
            .iter()
            .take(limit)
            .map(|p| p.description.as_str())
            .collect()
    }
}

/// Exit signals computed outside this core (intelligence extractor,
/// response-pattern analysis). All at rest by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementSignals {
    #[serde(default)]
    pub intelligence_complete: bool,
    #[serde(default)]
    pub scammer_suspicious: bool,
    #[serde(default)]
    pub turns_since_new_info: u32,
}

/// Which backend produced the reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum Responder {
    /// A text-generation model answered.
    Model(String),
    /// Generation failed and a canned reply was used.
    Fallback,
}

impl Responder {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Responder::Fallback)
    }
}

/// Outcome of one engagement turn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementResult {
    pub response: String,
    pub duration_secs: u64,
    pub notes: String,
    pub conversation_id: ConversationId,
    pub turn_number: u32,
    pub engagement_mode: EngagementMode,
    pub should_continue: bool,
    /// Present exactly when `should_continue` is false.
    pub exit_reason: Option<ExitReason>,
    pub responder: Responder,
}
