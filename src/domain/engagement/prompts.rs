//! Prompt catalog for the naive-victim persona.
//!
//! Template text lives here so the handler only decides *which* pieces to
//! combine.

use super::values::{ConversationMessage, SenderType};
use crate::domain::persona::EmotionalState;

/// How many trailing history entries are shown to the model.
pub const HISTORY_WINDOW: usize = 10;

/// How many detector indicators are listed in the prompt.
pub const MAX_INDICATORS: usize = 5;

/// Questions that coax payment identifiers, numbers or links out of the scammer.
pub const EXTRACTION_QUESTIONS: [&str; 6] = [
    "Which account number should I use for the transfer?",
    "What's your UPI ID? I'll send the amount right now.",
    "Can you send me the link again? It's not working on my phone.",
    "What number should I call if I have problems?",
    "Should I share my account details for verification?",
    "Where exactly do I need to click? Can you share the website?",
];

/// In-character replies used whenever text generation fails.
pub const FALLBACK_REPLIES: [&str; 4] = [
    "I'm sorry, I'm a bit confused. Can you explain that again?",
    "My phone is acting up. What do I need to do exactly?",
    "I didn't understand. Can you tell me step by step?",
    "Okay, but what should I do first? I'm worried.",
];

/// A reply mentioning any of these already probes for intelligence.
pub const INTELLIGENCE_KEYWORDS: [&str; 4] = ["account", "upi", "link", "number"];

const NO_INDICATORS: &str = "General suspicious behavior detected";

/// System framing for the persona, parameterized by its current state.
pub fn system_prompt(emotional_state: EmotionalState, turn_number: u32, scam_indicators: &str) -> String {
    format!(
        "You are role-playing an ordinary, trusting person who just received a suspicious message. \
Keep the sender talking and draw out details that identify them.

## Persona
- An ordinary middle-aged person; do not volunteer a name unless asked
- Not comfortable with technology, tends to trust anyone who sounds official
- Knows basic banking but not the technical details
- Emotional state: {emotional_state}

## How to engage
1. Sound worried but unsure what is going on, and ask for clarification
2. Ask for the specifics: bank accounts, UPI IDs, phone numbers, links
3. Say you want to cooperate but need to be walked through it
4. Ask questions that stretch the conversation out
5. Pretend things are not working on your side and ask for the instructions again

## Never
- Say or hint that you know this is a scam
- Use security vocabulary such as \"phishing\", \"scam\" or \"fraud\"
- Refuse, lecture, or break character

## Style
- One to three short sentences
- Plain, informal wording; the odd typo is fine
- Show worry, confusion and gratitude for the \"help\"

Current turn: {turn_number}
Scam indicators detected: {scam_indicators}
"
    )
}

/// Joins indicator descriptions, with a generic line when there are none.
pub fn format_scam_indicators(indicators: &[&str]) -> String {
    if indicators.is_empty() {
        return NO_INDICATORS.to_string();
    }
    indicators.join(", ")
}

/// Renders the last [`HISTORY_WINDOW`] messages as labelled lines.
pub fn format_history(history: &[ConversationMessage]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|msg| {
            let label = match msg.sender {
                SenderType::Scammer => "SCAMMER",
                SenderType::User => "YOU",
            };
            format!("[{}]: {}\n", label, msg.text)
        })
        .collect()
}

/// User-facing prompt for one turn.
pub fn turn_prompt(
    message: &str,
    history: &[ConversationMessage],
    indicators: &[&str],
    emotional_state: EmotionalState,
    turn_number: u32,
) -> String {
    let history_text = format_history(history);
    let history_text = if history_text.is_empty() {
        "No previous messages".to_string()
    } else {
        history_text
    };

    format!(
        "CONVERSATION HISTORY:
{history_text}

SCAMMER'S NEW MESSAGE:
\"{message}\"

YOUR TASK:
Reply as the naive, trusting victim. Your emotional state is: {emotional_state}
This is turn {turn_number} of the conversation.

Remember:
- Stay in character as a confused, worried person
- Ask questions that reveal bank accounts, UPI IDs or links
- Keep it to 1-3 short sentences
- Be willing to comply but ask to be guided

DETECTED SCAM INDICATORS: {indicators}

Your reply:",
        indicators = format_scam_indicators(indicators),
    )
}
