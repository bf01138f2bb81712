use std::fmt;

use serde::{Deserialize, Serialize};

/// Who a rendered chat bubble belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

/// Events emitted by the chat session for whatever front-end renders it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A message should be shown in the conversation
    MessageAdded { text: String, speaker: Speaker },

    /// Reply generation started
    TypingStarted,

    /// Reply generation finished (successfully or not)
    TypingStopped,

    /// Result of loading the stored endpoint settings
    ConfigLoaded { config: Option<ConfigSummary> },

    /// Endpoint settings were stored
    ConfigSaved,

    /// Settings panel should open, prefilled with `form`
    SettingsOpened { form: SettingsForm },

    SettingsClosed,

    /// User-visible notice
    Error { message: String },
}

/// Non-secret view of the endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub api_url: String,
    pub model_name: String,
}

/// Values to prefill the settings form with
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsForm {
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
}

impl fmt::Debug for SettingsForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsForm")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}

/// Split message text into its non-blank lines
pub fn paragraphs(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}
