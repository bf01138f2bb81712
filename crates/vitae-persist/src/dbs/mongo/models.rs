use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

use crate::models::{ApiConfig, Conversation, MessageRole, StoredMessage};

/// MongoDB-specific settings row (numeric `_id`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoApiConfig {
    #[serde(rename = "_id")]
    pub id: i64,
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
}

/// MongoDB-specific Conversation model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConversation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub session_id: String,
    pub created_at: bson::DateTime,
}

/// MongoDB-specific Message model (uses ObjectId)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMessage {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub conversation_id: ObjectId,
    pub role: MessageRole,
    pub content: String,
    pub created_at: bson::DateTime,
}

// Conversions between database-agnostic and MongoDB-specific models

impl From<&ApiConfig> for MongoApiConfig {
    fn from(config: &ApiConfig) -> Self {
        Self {
            id: config.id,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            model_name: config.model_name.clone(),
        }
    }
}

impl From<MongoApiConfig> for ApiConfig {
    fn from(config: MongoApiConfig) -> Self {
        Self {
            id: config.id,
            api_url: config.api_url,
            api_key: config.api_key,
            model_name: config.model_name,
        }
    }
}

impl From<MongoConversation> for Conversation {
    fn from(conversation: MongoConversation) -> Self {
        Self {
            id: conversation.id.to_hex(),
            session_id: conversation.session_id,
            created_at: Some(conversation.created_at.to_chrono()),
        }
    }
}

impl From<MongoMessage> for StoredMessage {
    fn from(msg: MongoMessage) -> Self {
        Self {
            id: msg.id.to_hex(),
            conversation_id: msg.conversation_id.to_hex(),
            role: msg.role,
            content: msg.content,
            created_at: msg.created_at.to_chrono(),
        }
    }
}
