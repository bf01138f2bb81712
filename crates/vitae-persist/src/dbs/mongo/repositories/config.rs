use mongodb::options::ReturnDocument;
use mongodb::{bson::doc, Client, Collection};

use crate::dbs::mongo::models::MongoApiConfig;
use crate::error::Result;

#[derive(Clone)]
pub struct MongoConfigRepository {
    collection: Collection<MongoApiConfig>,
}

impl MongoConfigRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("api_config");
        Self { collection }
    }

    pub async fn get(&self, id: i64) -> Result<Option<MongoApiConfig>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Replace an existing row; `None` if there was nothing to replace
    pub async fn replace(&self, config: &MongoApiConfig) -> Result<Option<MongoApiConfig>> {
        Ok(self
            .collection
            .find_one_and_replace(doc! { "_id": config.id }, config)
            .return_document(ReturnDocument::After)
            .await?)
    }

    pub async fn insert(&self, config: &MongoApiConfig) -> Result<()> {
        self.collection.insert_one(config).await?;
        Ok(())
    }

    /// Replace-or-insert in a single round trip
    pub async fn upsert(&self, config: &MongoApiConfig) -> Result<Option<MongoApiConfig>> {
        Ok(self
            .collection
            .find_one_and_replace(doc! { "_id": config.id }, config)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?)
    }
}
