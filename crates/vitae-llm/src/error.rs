use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    /// Endpoint answered with a non-success status
    #[error("Completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Success status, but the body is not a usable completion
    #[error("Unexpected completion response: {raw}")]
    MalformedResponse { raw: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid client configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LlmError>;
