use std::sync::Arc;

use tokio::sync::mpsc;
use vitae_llm::{ClientFactory, HttpClientFactory};
use vitae_persist::PersistenceClient;
use vitae_types::{ChatEvent, SessionConfig};

use crate::error::{Result, SessionError};
use crate::session::ChatSession;
use crate::templates::RESUME_ASSISTANT_PROMPT;

pub struct ChatSessionBuilder {
    store: Option<Arc<dyn PersistenceClient>>,
    client_factory: Option<Arc<dyn ClientFactory>>,
    config: SessionConfig,
}

impl ChatSessionBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            client_factory: None,
            config: SessionConfig::new(RESUME_ASSISTANT_PROMPT),
        }
    }

    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    /// Defaults to [`HttpClientFactory`] with the session's request timeout
    pub fn client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.client_factory = Some(factory);
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the session and the receiving end of its event channel.
    ///
    /// Events are sent with backpressure: once `event_buffer` events are
    /// queued, session calls wait for the receiver. Drain it on its own task
    /// (e.g. `tokio::spawn`), not after each call on the caller's task.
    pub fn build(self) -> Result<(ChatSession, mpsc::Receiver<ChatEvent>)> {
        let store = self
            .store
            .ok_or_else(|| SessionError::Setup("store is required".to_string()))?;

        if self.config.history_limit == 0 {
            tracing::warn!("history_limit is 0, requests will carry no prior turns");
        }
        if self.config.event_buffer == 0 {
            return Err(SessionError::Setup(
                "event_buffer must be greater than 0".to_string(),
            ));
        }

        let client_factory = self.client_factory.unwrap_or_else(|| {
            Arc::new(HttpClientFactory::new().with_timeout(self.config.request_timeout))
        });

        let (tx, rx) = mpsc::channel(self.config.event_buffer);
        Ok((ChatSession::new(store, client_factory, self.config, tx), rx))
    }
}

impl Default for ChatSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
