pub mod config;
pub mod conversation;
pub mod message;

pub use config::MongoConfigRepository;
pub use conversation::MongoConversationRepository;
pub use message::MongoMessageRepository;
