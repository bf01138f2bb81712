pub mod config;
pub mod error;
pub mod openai;
pub mod traits;
pub mod types;

pub use config::{ClientFactory, EndpointConfig, HttpClientFactory};
pub use error::LlmError;
pub use openai::OpenAICompatClient;
pub use traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, ThinkingMode, TokenUsage};
pub use types::{Message, Role};
