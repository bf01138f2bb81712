use serde::{Deserialize, Serialize};
use std::time::Duration;
use vitae_llm::{ChatOptions, ThinkingMode};

/// Fixed generation parameters sent with every completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub thinking: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 65536,
            temperature: 1.0,
            thinking: true,
        }
    }
}

impl GenerationConfig {
    pub fn to_options(&self) -> ChatOptions {
        ChatOptions::new()
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .thinking(ThinkingMode::from(self.thinking))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Prior messages included in each request
    pub history_limit: usize,
    /// Bound on history fetch plus completion call
    pub request_timeout: Duration,
    pub system_prompt: String,
    /// Capacity of the event channel
    pub event_buffer: usize,
    pub generation: GenerationConfig,
}

impl SessionConfig {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            history_limit: 10,
            request_timeout: Duration::from_secs(60),
            system_prompt: system_prompt.into(),
            event_buffer: 256,
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_defaults() {
        let options = GenerationConfig::default().to_options();
        assert_eq!(options.max_tokens, Some(65536));
        assert_eq!(options.temperature, Some(1.0));
        assert_eq!(options.thinking, Some(ThinkingMode::Enabled));
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfig::new("prompt")
            .with_history_limit(4)
            .with_timeout(Duration::from_secs(30))
            .with_event_buffer(8);

        assert_eq!(config.history_limit, 4);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.event_buffer, 8);
        assert_eq!(config.system_prompt, "prompt");
    }
}
