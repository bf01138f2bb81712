use serde::{Deserialize, Serialize};
use std::fmt;

/// The settings table holds a single row under this id
pub const CONFIG_ROW_ID: i64 = 1;

pub const DEFAULT_API_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";
pub const DEFAULT_MODEL_NAME: &str = "glm-4.7";

/// Stored completion endpoint settings
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub id: i64,
    pub api_url: String,
    pub api_key: String,
    pub model_name: String,
}

impl ApiConfig {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            id: CONFIG_ROW_ID,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model_name: model_name.into(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("id", &self.id)
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .finish()
    }
}
