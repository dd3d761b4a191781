//! Engagement Policy - routing and exit conditions.
//!
//! Pure decision logic: maps detector confidence to an engagement mode and
//! decides, from accumulated turn state, whether to keep talking. Holds no
//! per-conversation memory; callers must stop invoking turns once a stop
//! verdict is returned.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::PolicyError;
use super::values::EngagementSignals;
use crate::domain::foundation::Confidence;

/// Engagement intensity tier, ordered `None < Cautious < Aggressive`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EngagementMode {
    /// Monitoring only.
    None,
    /// Low-confidence scam, limited turns.
    Cautious,
    /// High-confidence scam, full engagement.
    Aggressive,
}

impl EngagementMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngagementMode::None => "none",
            EngagementMode::Cautious => "cautious",
            EngagementMode::Aggressive => "aggressive",
        }
    }

    /// Whether the honeypot should talk back at all in this mode.
    pub fn is_engaging(&self) -> bool {
        !matches!(self, EngagementMode::None)
    }
}

impl fmt::Display for EngagementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of an engagement, rebuilt for every decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementState {
    pub mode: EngagementMode,
    pub turn_count: u32,
    pub duration_secs: u64,
    pub intelligence_complete: bool,
    pub scammer_suspicious: bool,
    pub turns_since_new_info: u32,
}

impl EngagementState {
    /// State with every external signal at rest.
    pub fn new(mode: EngagementMode, turn_count: u32, duration_secs: u64) -> Self {
        Self {
            mode,
            turn_count,
            duration_secs,
            intelligence_complete: false,
            scammer_suspicious: false,
            turns_since_new_info: 0,
        }
    }

    /// Applies signals computed by external collaborators.
    pub fn with_signals(mut self, signals: EngagementSignals) -> Self {
        self.intelligence_complete = signals.intelligence_complete;
        self.scammer_suspicious = signals.scammer_suspicious;
        self.turns_since_new_info = signals.turns_since_new_info;
        self
    }
}

/// Why an engagement stopped, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitReason {
    TurnLimit { max_turns: u32 },
    DurationLimit { max_secs: u64 },
    IntelligenceComplete,
    ScammerSuspicious,
    Stale { turns: u32 },
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::TurnLimit { max_turns } => write!(f, "Max turns reached ({})", max_turns),
            ExitReason::DurationLimit { max_secs } => {
                write!(f, "Max duration exceeded ({}s)", max_secs)
            }
            ExitReason::IntelligenceComplete => f.write_str("Intelligence extraction complete"),
            ExitReason::ScammerSuspicious => f.write_str("Scammer became suspicious"),
            ExitReason::Stale { turns } => write!(f, "No new information in {} turns", turns),
        }
    }
}

/// Tunable limits of the policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyThresholds {
    pub cautious_threshold: f64,
    pub aggressive_threshold: f64,
    pub max_turns_cautious: u32,
    pub max_turns_aggressive: u32,
    pub max_duration_secs: u64,
    pub stale_turn_threshold: u32,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            cautious_threshold: 0.60,
            aggressive_threshold: 0.85,
            max_turns_cautious: 10,
            max_turns_aggressive: 25,
            max_duration_secs: 600,
            stale_turn_threshold: 5,
        }
    }
}

impl PolicyThresholds {
    /// Checks every invariant the policy relies on.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (name, value) in [
            ("cautious_threshold", self.cautious_threshold),
            ("aggressive_threshold", self.aggressive_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolicyError::ThresholdOutOfRange { name, value });
            }
        }

        if self.cautious_threshold > self.aggressive_threshold {
            return Err(PolicyError::ThresholdsInverted {
                cautious: self.cautious_threshold,
                aggressive: self.aggressive_threshold,
            });
        }

        if self.max_turns_cautious == 0 {
            return Err(PolicyError::ZeroLimit("max_turns_cautious"));
        }
        if self.max_turns_aggressive == 0 {
            return Err(PolicyError::ZeroLimit("max_turns_aggressive"));
        }
        if self.max_duration_secs == 0 {
            return Err(PolicyError::ZeroLimit("max_duration_secs"));
        }
        if self.stale_turn_threshold == 0 {
            return Err(PolicyError::ZeroLimit("stale_turn_threshold"));
        }

        Ok(())
    }
}

/// Determines engagement routing and exit conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementPolicy {
    thresholds: PolicyThresholds,
}

impl EngagementPolicy {
    /// Builds a policy, rejecting invalid limits up front.
    pub fn new(thresholds: PolicyThresholds) -> Result<Self, PolicyError> {
        thresholds.validate()?;

        if thresholds.max_turns_cautious > thresholds.max_turns_aggressive {
            tracing::warn!(
                max_turns_cautious = thresholds.max_turns_cautious,
                max_turns_aggressive = thresholds.max_turns_aggressive,
                "Cautious turn budget exceeds aggressive budget"
            );
        }

        Ok(Self { thresholds })
    }

    pub fn thresholds(&self) -> &PolicyThresholds {
        &self.thresholds
    }

    /// Routes a confidence score to a mode. Boundaries belong to the higher tier.
    pub fn engagement_mode(&self, confidence: Confidence) -> EngagementMode {
        let value = confidence.value();
        if value >= self.thresholds.aggressive_threshold {
            EngagementMode::Aggressive
        } else if value >= self.thresholds.cautious_threshold {
            EngagementMode::Cautious
        } else {
            EngagementMode::None
        }
    }

    /// Turn budget for a mode. `None` falls back to the cautious budget.
    pub fn max_turns(&self, mode: EngagementMode) -> u32 {
        match mode {
            EngagementMode::Aggressive => self.thresholds.max_turns_aggressive,
            EngagementMode::Cautious | EngagementMode::None => self.thresholds.max_turns_cautious,
        }
    }

    /// True unless any stop condition holds.
    pub fn should_continue(&self, state: &EngagementState) -> bool {
        self.exit_reason(state).is_none()
    }

    /// First matching stop condition: turns, duration, intelligence
    /// complete, scammer suspicious, then staleness.
    pub fn exit_reason(&self, state: &EngagementState) -> Option<ExitReason> {
        let max_turns = self.max_turns(state.mode);

        if state.turn_count >= max_turns {
            return Some(ExitReason::TurnLimit { max_turns });
        }
        if state.duration_secs >= self.thresholds.max_duration_secs {
            return Some(ExitReason::DurationLimit {
                max_secs: self.thresholds.max_duration_secs,
            });
        }
        if state.intelligence_complete {
            return Some(ExitReason::IntelligenceComplete);
        }
        if state.scammer_suspicious {
            return Some(ExitReason::ScammerSuspicious);
        }
        if state.turns_since_new_info >= self.thresholds.stale_turn_threshold {
            return Some(ExitReason::Stale {
                turns: self.thresholds.stale_turn_threshold,
            });
        }

        None
    }
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self {
            thresholds: PolicyThresholds::default(),
        }
    }
}
