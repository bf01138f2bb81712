use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic message model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMessage {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub conversation_id: String,
    pub role: MessageRole,
    pub content: String,
}

impl NewMessage {
    pub fn new(
        conversation_id: impl Into<String>,
        role: MessageRole,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<MessageRole> for vitae_llm::Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::System => vitae_llm::Role::System,
            MessageRole::User => vitae_llm::Role::User,
            MessageRole::Assistant => vitae_llm::Role::Assistant,
        }
    }
}

// Conversion: StoredMessage → vitae_llm::Message
impl From<&StoredMessage> for vitae_llm::Message {
    fn from(msg: &StoredMessage) -> Self {
        vitae_llm::Message::with_role(msg.role.into(), msg.content.clone())
    }
}
