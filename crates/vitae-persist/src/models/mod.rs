mod api_config;
mod conversation;
mod id;
mod message;

// Export database-agnostic models
pub use api_config::{ApiConfig, CONFIG_ROW_ID, DEFAULT_API_URL, DEFAULT_MODEL_NAME};
pub use conversation::Conversation;
pub use message::{MessageRole, NewMessage, StoredMessage};
