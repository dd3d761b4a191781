//! Persona Store - owns every live persona, keyed by conversation.
//!
//! Each persona sits behind its own async mutex. A turn checks the persona
//! out for its whole update-generate-finalize sequence, so two turns for
//! the same conversation serialize while turns for different conversations
//! only share the brief map lookup.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::persona::{Persona, PersonaContext};
use crate::domain::foundation::{Confidence, ConversationId, RandomSource};

/// Exclusive handle on one conversation's persona.
///
/// Dropping the guard (including when the owning future is cancelled)
/// releases the conversation for the next turn.
pub type PersonaGuard = OwnedMutexGuard<Persona>;

type PersonaSlot = Arc<AsyncMutex<Persona>>;

/// In-process persona registry with an explicit lifecycle.
///
/// Create one at service start, share it behind an `Arc`, and call
/// [`PersonaStore::shutdown`] when the service stops.
#[derive(Debug, Default)]
pub struct PersonaStore {
    personas: Mutex<HashMap<ConversationId, PersonaSlot>>,
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, conversation_id: &ConversationId) -> PersonaSlot {
        let mut personas = self.personas.lock().unwrap_or_else(PoisonError::into_inner);
        personas
            .entry(conversation_id.clone())
            .or_insert_with(|| {
                tracing::debug!(conversation_id = %conversation_id, "Creating persona");
                Arc::new(AsyncMutex::new(Persona::new()))
            })
            .clone()
    }

    /// Takes exclusive ownership of a conversation's persona, creating it
    /// on first reference. Waits while another turn holds it.
    pub async fn checkout(&self, conversation_id: &ConversationId) -> PersonaGuard {
        self.slot(conversation_id).lock_owned().await
    }

    /// Returns a snapshot of the persona, creating a default one if needed.
    pub async fn get_or_create(&self, conversation_id: &ConversationId) -> Persona {
        self.checkout(conversation_id).await.clone()
    }

    /// Applies one turn to the persona and returns the updated snapshot.
    ///
    /// Turn increment, emotional state and extraction count change together
    /// under the conversation's lock.
    pub async fn update(
        &self,
        conversation_id: &ConversationId,
        scam_intensity: Confidence,
        extracted_something: bool,
    ) -> Persona {
        let mut persona = self.checkout(conversation_id).await;
        persona.advance(scam_intensity, extracted_something);

        tracing::debug!(
            conversation_id = %conversation_id,
            turn = persona.engagement_turn(),
            emotional_state = %persona.emotional_state(),
            "Persona updated"
        );

        persona.clone()
    }

    /// Persona facts for prompt injection, including this turn's
    /// extraction coin flip.
    pub async fn persona_context(
        &self,
        conversation_id: &ConversationId,
        rng: &dyn RandomSource,
    ) -> PersonaContext {
        self.checkout(conversation_id).await.context(rng)
    }

    /// Forgets a conversation. Unknown ids are ignored.
    pub fn clear(&self, conversation_id: &ConversationId) {
        let removed = self
            .personas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(conversation_id)
            .is_some();

        if removed {
            tracing::debug!(conversation_id = %conversation_id, "Persona cleared");
        }
    }

    pub fn contains(&self, conversation_id: &ConversationId) -> bool {
        self.personas
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(conversation_id)
    }

    /// Number of live conversations.
    pub fn len(&self) -> usize {
        self.personas.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every persona. Returns how many were live.
    pub fn shutdown(&self) -> usize {
        let mut personas = self.personas.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = personas.len();
        personas.clear();

        tracing::info!(dropped, "Persona store shut down");
        dropped
    }
}
