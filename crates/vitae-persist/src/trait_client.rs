use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ApiConfig, Conversation, NewMessage, StoredMessage};

/// Trait for the store behind the chat session
///
/// Covers the settings row and the conversation/message tables. Implementations
/// map their native "no such row" condition to `PersistError::NotFound`.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Point lookup of the settings row
    async fn get_config(&self, id: i64) -> Result<ApiConfig>;

    /// Update the settings row with `config.id`; `NotFound` if it does not exist
    async fn update_config(&self, config: &ApiConfig) -> Result<ApiConfig>;

    async fn insert_config(&self, config: &ApiConfig) -> Result<ApiConfig>;

    /// Update, falling back to insert when the row is missing.
    ///
    /// Two concurrent first saves can both reach the insert; the loser gets
    /// whatever the store reports for a duplicate key. Backends with an
    /// atomic upsert override this.
    async fn upsert_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        match self.update_config(config).await {
            Err(e) if e.is_not_found() => {
                tracing::debug!(id = config.id, "Settings row missing, inserting");
                self.insert_config(config).await
            }
            other => other,
        }
    }

    async fn create_conversation(&self, session_id: &str) -> Result<Conversation>;

    async fn save_message(&self, message: NewMessage) -> Result<StoredMessage>;

    /// Most recent messages of a conversation, newest first, at most `limit`
    async fn latest_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>>;
}
