//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Scripted provider for testing
//! - `FailoverAIProvider` - Primary model with an optional fallback model
//! - `TimeoutAIProvider` - Per-call deadline around any provider

mod failover_provider;
mod mock_provider;
mod timeout_provider;

pub use failover_provider::{FailoverAIProvider, NoFallback};
pub use mock_provider::{MockAIProvider, MockResponse};
pub use timeout_provider::TimeoutAIProvider;
