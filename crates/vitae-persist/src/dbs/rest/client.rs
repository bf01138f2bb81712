// PostgREST backend (the query layer Supabase exposes under /rest/v1)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::{PersistError, Result};
use crate::models::{ApiConfig, Conversation, NewMessage, StoredMessage};
use crate::trait_client::PersistenceClient;

const CONFIG_TABLE: &str = "api_config";
const CONVERSATIONS_TABLE: &str = "conversations";
const MESSAGES_TABLE: &str = "messages";

/// Singular responses: PostgREST answers 406 + PGRST116 when zero rows match
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const NO_ROWS: &str = "PGRST116";

#[derive(Debug, Deserialize)]
struct PostgrestError {
    code: Option<String>,
    message: Option<String>,
}

pub struct RestPersistenceClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl RestPersistenceClient {
    /// `project_url` is the service root (e.g. `https://<ref>.supabase.co`)
    pub fn new(project_url: &str, api_key: &str) -> Result<Self> {
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| PersistError::Connection("Invalid store API key format".to_string()))?;
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| PersistError::Connection("Invalid store API key format".to_string()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    /// Request expecting exactly one row back
    fn single(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(ACCEPT, SINGLE_OBJECT)
            .header("Prefer", "return=representation")
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.send().await?;
        let response = Self::check(response, what).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed: Option<PostgrestError> = serde_json::from_str(&body).ok();
        let code = parsed.as_ref().and_then(|e| e.code.clone());

        if code.as_deref() == Some(NO_ROWS) {
            return Err(PersistError::NotFound(what.to_string()));
        }

        let message = parsed
            .and_then(|e| e.message)
            .filter(|m| !m.is_empty())
            .unwrap_or(body);

        tracing::warn!(status = status.as_u16(), code = ?code, %message, "Store query failed");
        Err(PersistError::Backend {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

#[async_trait]
impl PersistenceClient for RestPersistenceClient {
    async fn get_config(&self, id: i64) -> Result<ApiConfig> {
        let request = self
            .http_client
            .get(self.table_url(CONFIG_TABLE))
            .query(&[("id", format!("eq.{}", id)), ("select", "*".to_string())])
            .header(ACCEPT, SINGLE_OBJECT);

        self.send(request, &format!("Config {}", id)).await
    }

    async fn update_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        let request = self.single(
            self.http_client
                .patch(self.table_url(CONFIG_TABLE))
                .query(&[("id", format!("eq.{}", config.id))])
                .json(config),
        );

        self.send(request, &format!("Config {}", config.id)).await
    }

    async fn insert_config(&self, config: &ApiConfig) -> Result<ApiConfig> {
        let request = self.single(self.http_client.post(self.table_url(CONFIG_TABLE)).json(config));

        self.send(request, &format!("Config {}", config.id)).await
    }

    async fn create_conversation(&self, session_id: &str) -> Result<Conversation> {
        let request = self.single(
            self.http_client
                .post(self.table_url(CONVERSATIONS_TABLE))
                .json(&json!({ "session_id": session_id })),
        );

        self.send(request, "Conversation").await
    }

    async fn save_message(&self, message: NewMessage) -> Result<StoredMessage> {
        let request = self.single(
            self.http_client
                .post(self.table_url(MESSAGES_TABLE))
                .json(&message),
        );

        self.send(request, &format!("Conversation {}", message.conversation_id))
            .await
    }

    async fn latest_messages(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>> {
        let request = self.http_client.get(self.table_url(MESSAGES_TABLE)).query(&[
            ("conversation_id", format!("eq.{}", conversation_id)),
            ("select", "*".to_string()),
            ("order", "created_at.desc,id.desc".to_string()),
            ("limit", limit.to_string()),
        ]);

        self.send(request, &format!("Conversation {}", conversation_id))
            .await
    }
}
