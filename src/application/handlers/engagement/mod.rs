//! Engagement command handlers.

mod end_conversation;
mod process_turn;

pub use end_conversation::{EndConversationCommand, EndConversationHandler};
pub use process_turn::{GenerationSettings, ProcessTurnCommand, ProcessTurnHandler};
