// Endpoint settings and client construction

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::openai::OpenAICompatClient;
use crate::traits::ChatClient;

/// Upper bound on a single completion request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where to send completions and how to authenticate
#[derive(Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    /// Full chat-completions URL (not a base URL)
    pub url: String,
    pub api_key: String,
}

impl EndpointConfig {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Creates chat clients on demand.
///
/// Endpoint credentials can change at runtime (the user edits settings), so
/// callers hold a factory rather than a fixed client.
pub trait ClientFactory: Send + Sync {
    fn create_chat_client(&self, endpoint: &EndpointConfig) -> Result<Arc<dyn ChatClient>>;
}

/// Factory for [`OpenAICompatClient`]
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    timeout: Duration,
}

impl HttpClientFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientFactory for HttpClientFactory {
    fn create_chat_client(&self, endpoint: &EndpointConfig) -> Result<Arc<dyn ChatClient>> {
        let client = OpenAICompatClient::with_timeout(endpoint, self.timeout)?;
        Ok(Arc::new(client))
    }
}
