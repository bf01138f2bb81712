pub mod builder;
pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use builder::{PersistClientBuilder, StoreBackend};
pub use dbs::memory::MemoryPersistenceClient;
pub use dbs::rest::RestPersistenceClient;
#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoPersistenceClient;
pub use error::PersistError;
pub use models::{
    ApiConfig, Conversation, MessageRole, NewMessage, StoredMessage, CONFIG_ROW_ID,
    DEFAULT_API_URL, DEFAULT_MODEL_NAME,
};
pub use trait_client::PersistenceClient;
