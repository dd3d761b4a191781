//! Persona Domain Module
//!
//! The simulated victim's per-conversation state and the store that owns
//! its lifecycle.
//!
//! # Example
//!
//! ```ignore
//! let store = PersonaStore::new();
//! let persona = store.update(&conversation_id, Confidence::new(0.9), false).await;
//! assert_eq!(persona.emotional_state(), EmotionalState::Panicked);
//! ```

mod persona;
mod store;

pub use persona::{EmotionalState, Persona, PersonaContext, PersonaTrait};
pub use store::{PersonaGuard, PersonaStore};
