use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use vitae_persist::StoreBackend;
use vitae_session::RESUME_ASSISTANT_PROMPT;
use vitae_types::{GenerationConfig, SessionConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub session: SessionSettings,
    #[serde(default)]
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default, skip_deserializing)]
    pub store_key: String,
    #[serde(default, skip_deserializing)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    Rest,
    Mongodb,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Project URL of the REST store, without `/rest/v1`
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_database() -> String {
    "vitae".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub history_limit: usize,
    pub request_timeout_secs: u64,
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables such as `VITAE_STORE__BACKEND=rest`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("VITAE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        cfg.store_key = std::env::var("STORE_KEY").unwrap_or_default();
        cfg.mongodb_uri = std::env::var("MONGODB_URI").unwrap_or_default();
        cfg.validate()?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));
        builder.build()?.try_deserialize()
    }

    /// Secrets required by the selected backend are present
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.store.backend {
            BackendKind::Memory => Ok(()),
            BackendKind::Rest if self.store.url.trim().is_empty() => Err(ConfigError::Message(
                "store.url is required for the rest backend".to_string(),
            )),
            BackendKind::Rest if self.store_key.is_empty() => Err(ConfigError::Message(
                "STORE_KEY environment variable is required".to_string(),
            )),
            BackendKind::Rest => Ok(()),
            BackendKind::Mongodb if self.mongodb_uri.is_empty() => Err(ConfigError::Message(
                "MONGODB_URI environment variable is required".to_string(),
            )),
            BackendKind::Mongodb => Ok(()),
        }
    }

    pub fn store_backend(&self) -> Result<StoreBackend, ConfigError> {
        match self.store.backend {
            BackendKind::Memory => Ok(StoreBackend::Memory),
            BackendKind::Rest => Ok(StoreBackend::Rest {
                url: self.store.url.clone(),
                api_key: self.store_key.clone(),
            }),
            #[cfg(feature = "mongodb")]
            BackendKind::Mongodb => Ok(StoreBackend::MongoDb {
                uri: self.mongodb_uri.clone(),
                database: self.store.database.clone(),
            }),
            #[cfg(not(feature = "mongodb"))]
            BackendKind::Mongodb => Err(ConfigError::Message(
                "mongodb backend requires building with the `mongodb` feature".to_string(),
            )),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(RESUME_ASSISTANT_PROMPT)
            .with_history_limit(self.session.history_limit)
            .with_timeout(Duration::from_secs(self.session.request_timeout_secs))
            .with_event_buffer(self.session.event_buffer)
            .with_generation(self.generation.clone())
    }
}
