pub mod config;
pub mod events;

pub use config::{GenerationConfig, SessionConfig};
pub use events::{paragraphs, ChatEvent, ConfigSummary, SettingsForm, Speaker};
