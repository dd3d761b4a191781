//! EndConversationHandler - Forget a finished conversation's persona

use std::sync::Arc;

use crate::domain::foundation::ConversationId;
use crate::domain::persona::PersonaStore;

/// Command to end a conversation
#[derive(Debug, Clone)]
pub struct EndConversationCommand {
    pub conversation_id: ConversationId,
}

/// Handler for ending conversations
///
/// Unknown conversations are not an error; ending one twice is harmless.
pub struct EndConversationHandler {
    personas: Arc<PersonaStore>,
}

impl EndConversationHandler {
    pub fn new(personas: Arc<PersonaStore>) -> Self {
        Self { personas }
    }

    /// Returns whether a persona was live for the conversation.
    pub fn handle(&self, cmd: EndConversationCommand) -> bool {
        let existed = self.personas.contains(&cmd.conversation_id);
        self.personas.clear(&cmd.conversation_id);

        tracing::info!(
            conversation_id = %cmd.conversation_id,
            existed,
            "Conversation ended"
        );
        existed
    }
}
