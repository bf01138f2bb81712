#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};
use vitae_llm::{
    ChatClient, ChatRequest, ChatResponse, ClientFactory, EndpointConfig, LlmError,
};
use vitae_persist::{
    ApiConfig, Conversation, MemoryPersistenceClient, NewMessage, PersistError,
    PersistenceClient, StoredMessage,
};
use vitae_types::ChatEvent;

pub fn reply(content: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_string(),
        finish_reason: Some("stop".to_string()),
        usage: None,
        raw: serde_json::json!({}),
    }
}

/// Scripted chat client that records every request it receives
#[derive(Default)]
pub struct MockChatClient {
    script: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Arc<Gate>>,
}

/// Holds a call inside `chat` until released
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(self, content: &str) -> Self {
        self.push(Ok(reply(content)));
        self
    }

    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn with_gate(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push(&self, result: Result<ChatResponse, LlmError>) {
        self.script.lock().unwrap().push_back(result);
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn chat(&self, request: ChatRequest) -> vitae_llm::error::Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply("default reply")))
    }
}

/// Hands out the same mock client for every endpoint and records the endpoints
pub struct MockFactory {
    pub client: Arc<MockChatClient>,
    endpoints: Mutex<Vec<EndpointConfig>>,
}

impl MockFactory {
    pub fn new(client: Arc<MockChatClient>) -> Self {
        Self {
            client,
            endpoints: Mutex::new(Vec::new()),
        }
    }

    pub fn endpoints(&self) -> Vec<EndpointConfig> {
        self.endpoints.lock().unwrap().clone()
    }
}

impl ClientFactory for MockFactory {
    fn create_chat_client(
        &self,
        endpoint: &EndpointConfig,
    ) -> vitae_llm::error::Result<Arc<dyn ChatClient>> {
        if endpoint.url.is_empty() {
            return Err(LlmError::Config("url is empty".to_string()));
        }
        self.endpoints.lock().unwrap().push(endpoint.clone());
        Ok(self.client.clone())
    }
}

/// Memory store with call counters and switchable failures
#[derive(Default)]
pub struct CountingStore {
    pub inner: MemoryPersistenceClient,
    pub get_config_calls: AtomicUsize,
    pub update_config_calls: AtomicUsize,
    pub insert_config_calls: AtomicUsize,
    pub create_conversation_calls: AtomicUsize,
    pub save_message_calls: AtomicUsize,
    pub latest_messages_calls: AtomicUsize,
    pub fail_get_config: AtomicBool,
    pub fail_save_message: AtomicBool,
    pub fail_latest_messages: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_writes(&self) -> usize {
        self.update_config_calls.load(Ordering::SeqCst)
            + self.insert_config_calls.load(Ordering::SeqCst)
    }

    fn unavailable() -> PersistError {
        PersistError::Backend {
            status: 503,
            code: None,
            message: "store unavailable".to_string(),
        }
    }
}

#[async_trait]
impl PersistenceClient for CountingStore {
    async fn get_config(&self, id: i64) -> vitae_persist::error::Result<ApiConfig> {
        self.get_config_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get_config.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.get_config(id).await
    }

    async fn update_config(&self, config: &ApiConfig) -> vitae_persist::error::Result<ApiConfig> {
        self.update_config_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update_config(config).await
    }

    async fn insert_config(&self, config: &ApiConfig) -> vitae_persist::error::Result<ApiConfig> {
        self.insert_config_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert_config(config).await
    }

    async fn create_conversation(
        &self,
        session_id: &str,
    ) -> vitae_persist::error::Result<Conversation> {
        self.create_conversation_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create_conversation(session_id).await
    }

    async fn save_message(
        &self,
        message: NewMessage,
    ) -> vitae_persist::error::Result<StoredMessage> {
        self.save_message_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save_message.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.save_message(message).await
    }

    async fn latest_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> vitae_persist::error::Result<Vec<StoredMessage>> {
        self.latest_messages_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_latest_messages.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.latest_messages(conversation_id, limit).await
    }
}

/// Everything currently queued on the event channel
pub fn drain(rx: &mut mpsc::Receiver<ChatEvent>) -> Vec<ChatEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
