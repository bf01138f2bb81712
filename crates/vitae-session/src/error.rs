use std::time::Duration;

use thiserror::Error;
use vitae_llm::LlmError;
use vitae_persist::PersistError;

#[derive(Error, Debug)]
pub enum SessionError {
    /// Bad user input; never reaches the store or the network
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Endpoint settings are not configured")]
    ConfigMissing,

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistError),

    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected completion response: {raw}")]
    MalformedResponse { raw: String },

    #[error("Completion request failed: {0}")]
    Transport(String),

    /// Stored endpoint settings cannot be turned into a client
    #[error("Invalid endpoint settings: {0}")]
    InvalidEndpoint(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Session setup error: {0}")]
    Setup(String),
}

impl From<LlmError> for SessionError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Api { status, message } => Self::Api { status, message },
            LlmError::MalformedResponse { raw } => Self::MalformedResponse { raw },
            LlmError::Config(message) => Self::InvalidEndpoint(message),
            LlmError::Transport(e) => Self::Transport(e.to_string()),
            LlmError::Serialization(e) => Self::Transport(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
