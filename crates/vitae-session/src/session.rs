use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex, RwLock};
use vitae_llm::{ChatClient, ChatRequest, ClientFactory, EndpointConfig};
use vitae_persist::{
    ApiConfig, MessageRole, NewMessage, PersistenceClient, StoredMessage, CONFIG_ROW_ID,
    DEFAULT_API_URL, DEFAULT_MODEL_NAME,
};
use vitae_types::{ChatEvent, ConfigSummary, SessionConfig, SettingsForm, Speaker};

use crate::builder::ChatSessionBuilder;
use crate::context::build_messages;
use crate::error::{Result, SessionError};
use crate::identity::generate_session_id;
use crate::templates::{
    CONFIG_MISSING_NOTICE, FALLBACK_REPLY, LOAD_FAILED_NOTICE, REQUIRED_FIELDS_NOTICE,
};

/// How a call to [`ChatSession::send_message`] ended
#[derive(Debug)]
pub enum SendOutcome {
    /// Input was blank after trimming
    Ignored,
    /// Another send is in flight; nothing happened
    Busy,
    /// No endpoint settings; the settings panel was requested
    ConfigMissing,
    /// Reply shown and handed to the store
    Replied(String),
    /// Endpoint answered with no text; nothing shown or stored
    EmptyReply,
    /// Fallback reply shown, nothing stored
    Failed(SessionError),
}

/// Settings currently in effect and the client built from them
struct ActiveConfig {
    config: ApiConfig,
    client: Arc<dyn ChatClient>,
}

/// Clears the busy flag when dropped, including when the send future is cancelled
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One user's chat with the résumé assistant.
///
/// Owns the endpoint settings, the lazily created conversation, and the
/// single-flight guard for sends. Front-ends call the public methods and
/// render the [`ChatEvent`]s received on the channel returned by the builder.
pub struct ChatSession {
    store: Arc<dyn PersistenceClient>,
    client_factory: Arc<dyn ClientFactory>,
    config: SessionConfig,
    events: mpsc::Sender<ChatEvent>,
    active: RwLock<Option<ActiveConfig>>,
    conversation_id: Mutex<Option<String>>,
    busy: AtomicBool,
    settings_open: AtomicBool,
}

impl ChatSession {
    pub fn builder() -> ChatSessionBuilder {
        ChatSessionBuilder::new()
    }

    pub(crate) fn new(
        store: Arc<dyn PersistenceClient>,
        client_factory: Arc<dyn ClientFactory>,
        config: SessionConfig,
        events: mpsc::Sender<ChatEvent>,
    ) -> Self {
        Self {
            store,
            client_factory,
            config,
            events,
            active: RwLock::new(None),
            conversation_id: Mutex::new(None),
            busy: AtomicBool::new(false),
            settings_open: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn settings_open(&self) -> bool {
        self.settings_open.load(Ordering::Acquire)
    }

    pub async fn api_config(&self) -> Option<ApiConfig> {
        self.active.read().await.as_ref().map(|a| a.config.clone())
    }

    pub async fn conversation_id(&self) -> Option<String> {
        self.conversation_id.lock().await.clone()
    }

    /// Load stored settings; open the settings panel when there are none
    pub async fn start(&self) {
        match self.load_config().await {
            Ok(Some(_)) => {}
            Ok(None) | Err(_) => self.open_settings().await,
        }
    }

    /// Fetch the settings row. A missing row is `Ok(None)`, not an error.
    pub async fn load_config(&self) -> Result<Option<ApiConfig>> {
        let config = match self.store.get_config(CONFIG_ROW_ID).await {
            Ok(config) => config,
            Err(e) if e.is_not_found() => {
                tracing::info!("No stored settings yet, first-time setup required");
                self.emit(ChatEvent::ConfigLoaded { config: None }).await;
                return Ok(None);
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load settings");
                self.notify_error(LOAD_FAILED_NOTICE).await;
                return Err(e.into());
            }
        };

        let active = match self.activate(config) {
            Ok(active) => active,
            Err(e) => {
                tracing::error!(error = %e, "Stored settings are unusable");
                self.notify_error(LOAD_FAILED_NOTICE).await;
                return Err(e);
            }
        };

        let summary = summarize(&active.config);
        let config = active.config.clone();
        *self.active.write().await = Some(active);

        tracing::info!(model = %config.model_name, "Settings loaded");
        self.emit(ChatEvent::ConfigLoaded {
            config: Some(summary),
        })
        .await;
        Ok(Some(config))
    }

    /// Validate and store endpoint settings, then make them current
    pub async fn save_config(
        &self,
        api_url: &str,
        api_key: &str,
        model_name: &str,
    ) -> Result<ApiConfig> {
        let (api_url, api_key, model_name) = (api_url.trim(), api_key.trim(), model_name.trim());

        if api_url.is_empty() || api_key.is_empty() || model_name.is_empty() {
            self.notify_error(REQUIRED_FIELDS_NOTICE).await;
            return Err(SessionError::Validation(
                "api_url, api_key and model_name are required".to_string(),
            ));
        }

        let candidate = ApiConfig::new(api_url, api_key, model_name);
        if let Err(e) = self.client_factory.create_chat_client(&endpoint(&candidate)) {
            self.notify_error(&format!("Invalid settings: {}", e)).await;
            return Err(SessionError::Validation(e.to_string()));
        }

        let stored = match self.store.upsert_config(&candidate).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save settings");
                self.notify_error(&format!("Failed to save configuration: {}", e))
                    .await;
                return Err(e.into());
            }
        };

        let active = self.activate(stored)?;
        let config = active.config.clone();
        *self.active.write().await = Some(active);

        tracing::info!(model = %config.model_name, "Settings saved");
        self.emit(ChatEvent::ConfigSaved).await;
        self.close_settings().await;
        Ok(config)
    }

    /// Run one chat turn.
    ///
    /// Blank input and concurrent calls are no-ops. Failures never escape:
    /// the user sees a fallback reply and the outcome carries the error.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            tracing::debug!("Send rejected, another send is in flight");
            return SendOutcome::Busy;
        };

        if self.active.read().await.is_none() {
            self.notify_error(CONFIG_MISSING_NOTICE).await;
            self.open_settings().await;
            return SendOutcome::ConfigMissing;
        }

        self.emit(ChatEvent::MessageAdded {
            text: text.to_string(),
            speaker: Speaker::User,
        })
        .await;
        self.emit(ChatEvent::TypingStarted).await;

        let timeout = self.config.request_timeout;
        let result = match tokio::time::timeout(timeout, self.assemble_and_call_model(text)).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout(timeout)),
        };

        self.emit(ChatEvent::TypingStopped).await;

        match result {
            Ok(reply) if reply.is_empty() => {
                tracing::warn!("Completion returned no text, skipping turn");
                SendOutcome::EmptyReply
            }
            Ok(reply) => {
                self.emit(ChatEvent::MessageAdded {
                    text: reply.clone(),
                    speaker: Speaker::Assistant,
                })
                .await;

                // The reply is already on screen; store failures are only logged
                let turn = [
                    (text, MessageRole::User),
                    (reply.as_str(), MessageRole::Assistant),
                ];
                for (content, role) in turn {
                    if let Err(e) = self.save_message(content, role).await {
                        tracing::warn!(error = %e, role = ?role, "Failed to persist message");
                    }
                }

                SendOutcome::Replied(reply)
            }
            Err(e) => {
                tracing::error!(error = %e, "Chat turn failed");
                self.emit(ChatEvent::MessageAdded {
                    text: FALLBACK_REPLY.to_string(),
                    speaker: Speaker::Assistant,
                })
                .await;
                SendOutcome::Failed(e)
            }
        }
    }

    /// Build the request from recent history and return the trimmed reply
    pub async fn assemble_and_call_model(&self, user_message: &str) -> Result<String> {
        let (model, client) = {
            let active = self.active.read().await;
            let active = active.as_ref().ok_or(SessionError::ConfigMissing)?;
            (active.config.model_name.clone(), Arc::clone(&active.client))
        };

        let history = self.recent_history(self.config.history_limit).await;
        let messages = build_messages(&self.config.system_prompt, &history, user_message);

        tracing::debug!(
            model = %model,
            history = history.len(),
            messages = messages.len(),
            "Assembled completion request"
        );

        let request =
            ChatRequest::new(model, messages).with_options(self.config.generation.to_options());
        let response = client.chat(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Completion usage"
            );
        }

        Ok(response.content)
    }

    /// Last `limit` messages of the conversation, oldest first.
    ///
    /// Empty before the first stored turn. Store failures degrade to an
    /// empty history so the turn can still go out.
    pub async fn recent_history(&self, limit: usize) -> Vec<StoredMessage> {
        let Some(conversation_id) = self.conversation_id.lock().await.clone() else {
            return Vec::new();
        };

        match self.store.latest_messages(&conversation_id, limit).await {
            Ok(mut messages) => {
                messages.truncate(limit);
                messages.reverse();
                messages
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    %conversation_id,
                    "Failed to fetch history, continuing without it"
                );
                Vec::new()
            }
        }
    }

    /// Id of this session's conversation, created on first use
    pub async fn ensure_conversation(&self) -> Result<String> {
        let mut conversation_id = self.conversation_id.lock().await;
        if let Some(id) = conversation_id.as_ref() {
            return Ok(id.clone());
        }

        let session_id = generate_session_id();
        let conversation = self.store.create_conversation(&session_id).await?;
        tracing::info!(conversation_id = %conversation.id, %session_id, "Conversation created");

        *conversation_id = Some(conversation.id.clone());
        Ok(conversation.id)
    }

    /// Append one message to this session's conversation
    pub async fn save_message(&self, content: &str, role: MessageRole) -> Result<StoredMessage> {
        let conversation_id = self.ensure_conversation().await?;
        let stored = self
            .store
            .save_message(NewMessage::new(conversation_id, role, content))
            .await?;
        Ok(stored)
    }

    /// Open or close the settings panel; returns whether it is now open
    pub async fn toggle_settings(&self) -> bool {
        if self.settings_open() {
            self.close_settings().await;
            false
        } else {
            self.open_settings().await;
            true
        }
    }

    /// Prefill values for the settings panel
    pub async fn settings_form(&self) -> SettingsForm {
        let active = self.active.read().await;
        let or_default = |value: &str, default: &str| {
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        };

        match active.as_ref().map(|a| &a.config) {
            Some(config) => SettingsForm {
                api_url: or_default(&config.api_url, DEFAULT_API_URL),
                api_key: config.api_key.clone(),
                model_name: or_default(&config.model_name, DEFAULT_MODEL_NAME),
            },
            None => SettingsForm {
                api_url: DEFAULT_API_URL.to_string(),
                api_key: String::new(),
                model_name: DEFAULT_MODEL_NAME.to_string(),
            },
        }
    }

    async fn open_settings(&self) {
        self.settings_open.store(true, Ordering::Release);
        let form = self.settings_form().await;
        self.emit(ChatEvent::SettingsOpened { form }).await;
    }

    async fn close_settings(&self) {
        self.settings_open.store(false, Ordering::Release);
        self.emit(ChatEvent::SettingsClosed).await;
    }

    fn activate(&self, config: ApiConfig) -> Result<ActiveConfig> {
        let client = self.client_factory.create_chat_client(&endpoint(&config))?;
        Ok(ActiveConfig { config, client })
    }

    async fn notify_error(&self, message: &str) {
        self.emit(ChatEvent::Error {
            message: message.to_string(),
        })
        .await;
    }

    async fn emit(&self, event: ChatEvent) {
        if self.events.send(event).await.is_err() {
            tracing::trace!("Event receiver dropped");
        }
    }
}

fn endpoint(config: &ApiConfig) -> EndpointConfig {
    EndpointConfig::new(config.api_url.clone(), config.api_key.clone())
}

fn summarize(config: &ApiConfig) -> ConfigSummary {
    ConfigSummary {
        api_url: config.api_url.clone(),
        model_name: config.model_name.clone(),
    }
}
