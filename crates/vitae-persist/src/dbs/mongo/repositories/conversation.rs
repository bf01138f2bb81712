use mongodb::bson::{self, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::dbs::mongo::models::MongoConversation;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoConversationRepository {
    collection: Collection<MongoConversation>,
}

impl MongoConversationRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("conversations");
        Self { collection }
    }

    /// Create a new conversation
    pub async fn create(&self, session_id: &str) -> Result<MongoConversation> {
        let conversation = MongoConversation {
            id: ObjectId::new(),
            session_id: session_id.to_string(),
            created_at: bson::DateTime::now(),
        };

        self.collection.insert_one(&conversation).await?;
        Ok(conversation)
    }

    pub async fn exists(&self, id: ObjectId) -> Result<bool> {
        let count = self
            .collection
            .count_documents(bson::doc! { "_id": id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }
}
