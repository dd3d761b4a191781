//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod engagement;

pub use engagement::{
    EndConversationCommand, EndConversationHandler, GenerationSettings, ProcessTurnCommand,
    ProcessTurnHandler,
};
