use async_trait::async_trait;
use mongodb::bson::{self, oid::ObjectId};
use mongodb::Client;

use crate::dbs::mongo::models::{MongoApiConfig, MongoMessage};
use crate::dbs::mongo::repositories::{
    MongoConfigRepository, MongoConversationRepository, MongoMessageRepository,
};
use crate::error::{PersistError, Result};
use crate::models::{ApiConfig, Conversation, NewMessage, StoredMessage};
use crate::trait_client::PersistenceClient;

pub struct MongoPersistenceClient {
    config_repo: MongoConfigRepository,
    conversation_repo: MongoConversationRepository,
    message_repo: MongoMessageRepository,
}

impl MongoPersistenceClient {
    /// Connect to MongoDB and create client
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            config_repo: MongoConfigRepository::new(&client, database),
            conversation_repo: MongoConversationRepository::new(&client, database),
            message_repo: MongoMessageRepository::new(&client, database),
        })
    }
}

fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(e.to_string()))
}

#[async_trait]
impl PersistenceClient for MongoPersistenceClient {
    async fn get_config(&self, id: i64) -> Result<ApiConfig> {
        self.config_repo
            .get(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::NotFound(format!("Config {}", id)))
    }

    async fn update_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        self.config_repo
            .replace(&MongoApiConfig::from(config))
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::NotFound(format!("Config {}", config.id)))
    }

    async fn insert_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        self.config_repo.insert(&MongoApiConfig::from(config)).await?;
        Ok(config.clone())
    }

    async fn upsert_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        self.config_repo
            .upsert(&MongoApiConfig::from(config))
            .await?
            .map(Into::into)
            .ok_or_else(|| PersistError::Internal("Upsert returned no document".to_string()))
    }

    async fn create_conversation(&self, session_id: &str) -> Result<Conversation> {
        Ok(self.conversation_repo.create(session_id).await?.into())
    }

    async fn save_message(&self, message: NewMessage) -> Result<StoredMessage> {
        let conversation_id = parse_object_id(&message.conversation_id)?;
        if !self.conversation_repo.exists(conversation_id).await? {
            return Err(PersistError::NotFound(format!(
                "Conversation {}",
                message.conversation_id
            )));
        }

        let mongo_message = MongoMessage {
            id: ObjectId::new(),
            conversation_id,
            role: message.role,
            content: message.content,
            created_at: bson::DateTime::now(),
        };
        self.message_repo.save(&mongo_message).await?;
        Ok(mongo_message.into())
    }

    async fn latest_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>> {
        let object_id = parse_object_id(conversation_id)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let messages = self.message_repo.latest(object_id, limit).await?;
        Ok(messages.into_iter().map(Into::into).collect())
    }
}
