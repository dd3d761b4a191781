//! Application layer - Commands and Handlers.
//!
//! This layer sequences domain operations around the text-generation port.

pub mod handlers;
mod orchestrator;

pub use handlers::{
    EndConversationCommand, EndConversationHandler, GenerationSettings, ProcessTurnCommand,
    ProcessTurnHandler,
};
pub use orchestrator::{EngagementOrchestrator, OrchestratorError};
