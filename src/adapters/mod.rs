//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - text-generation providers and wrappers

pub mod ai;

pub use ai::{FailoverAIProvider, MockAIProvider, TimeoutAIProvider};
