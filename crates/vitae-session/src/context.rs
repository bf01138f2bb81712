use vitae_llm::Message;
use vitae_persist::{MessageRole, StoredMessage};

/// Request messages for one turn: system prompt, prior turns, new input.
///
/// `history` must already be oldest first. Stored system rows are skipped so
/// the only instruction is the current prompt.
pub fn build_messages(
    system_prompt: &str,
    history: &[StoredMessage],
    user_message: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(
        history
            .iter()
            .filter(|m| matches!(m.role, MessageRole::User | MessageRole::Assistant))
            .map(Message::from),
    );
    messages.push(Message::human(user_message));
    messages
}
