use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use crate::error::{PersistError, Result};
use crate::models::{ApiConfig, Conversation, NewMessage, StoredMessage};
use crate::trait_client::PersistenceClient;

#[derive(Default)]
struct Tables {
    config: HashMap<i64, ApiConfig>,
    conversations: Vec<Conversation>,
    // Insertion order; `created_at` is strictly increasing per conversation
    messages: Vec<StoredMessage>,
    next_message_id: u64,
}

/// Process-local store. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryPersistenceClient {
    tables: RwLock<Tables>,
}

impl MemoryPersistenceClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn conversation_count(&self) -> usize {
        self.tables.read().await.conversations.len()
    }

    /// All messages of a conversation, oldest first
    pub async fn messages_for(&self, conversation_id: &str) -> Vec<StoredMessage> {
        self.tables
            .read()
            .await
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PersistenceClient for MemoryPersistenceClient {
    async fn get_config(&self, id: i64) -> Result<ApiConfig> {
        self.tables
            .read()
            .await
            .config
            .get(&id)
            .cloned()
            .ok_or_else(|| PersistError::NotFound(format!("Config {}", id)))
    }

    async fn update_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        let mut tables = self.tables.write().await;
        let row = tables
            .config
            .get_mut(&config.id)
            .ok_or_else(|| PersistError::NotFound(format!("Config {}", config.id)))?;
        *row = config.clone();
        Ok(row.clone())
    }

    async fn insert_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        let mut tables = self.tables.write().await;
        if tables.config.contains_key(&config.id) {
            return Err(PersistError::Backend {
                status: 409,
                code: Some("23505".to_string()),
                message: format!("duplicate key: config {}", config.id),
            });
        }
        tables.config.insert(config.id, config.clone());
        Ok(config.clone())
    }

    async fn create_conversation(&self, session_id: &str) -> Result<Conversation> {
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            created_at: Some(Utc::now()),
        };
        self.tables
            .write()
            .await
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn save_message(&self, message: NewMessage) -> Result<StoredMessage> {
        let mut tables = self.tables.write().await;

        if !tables
            .conversations
            .iter()
            .any(|c| c.id == message.conversation_id)
        {
            return Err(PersistError::NotFound(format!(
                "Conversation {}",
                message.conversation_id
            )));
        }

        let mut created_at = Utc::now();
        if let Some(last) = tables
            .messages
            .iter()
            .rev()
            .find(|m| m.conversation_id == message.conversation_id)
        {
            if created_at <= last.created_at {
                created_at = last.created_at + Duration::microseconds(1);
            }
        }

        tables.next_message_id += 1;
        let stored = StoredMessage {
            id: tables.next_message_id.to_string(),
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            created_at,
        };
        tables.messages.push(stored.clone());
        Ok(stored)
    }

    async fn latest_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>> {
        Ok(self
            .tables
            .read()
            .await
            .messages
            .iter()
            .rev()
            .filter(|m| m.conversation_id == conversation_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
