use std::sync::Arc;

use crate::dbs::memory::MemoryPersistenceClient;
use crate::dbs::rest::RestPersistenceClient;
use crate::error::{PersistError, Result};
use crate::trait_client::PersistenceClient;

/// Which store to talk to
#[derive(Clone)]
pub enum StoreBackend {
    Memory,
    Rest {
        url: String,
        api_key: String,
    },
    #[cfg(feature = "mongodb")]
    MongoDb {
        uri: String,
        database: String,
    },
}

impl std::fmt::Debug for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => f.write_str("Memory"),
            Self::Rest { url, .. } => f
                .debug_struct("Rest")
                .field("url", url)
                .finish_non_exhaustive(),
            #[cfg(feature = "mongodb")]
            Self::MongoDb { database, .. } => f
                .debug_struct("MongoDb")
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

pub struct PersistClientBuilder {
    backend: Option<StoreBackend>,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self { backend: None }
    }

    pub fn backend(mut self, backend: StoreBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn memory(self) -> Self {
        self.backend(StoreBackend::Memory)
    }

    pub fn rest(self, url: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.backend(StoreBackend::Rest {
            url: url.into(),
            api_key: api_key.into(),
        })
    }

    #[cfg(feature = "mongodb")]
    pub fn mongodb(self, uri: impl Into<String>, database: impl Into<String>) -> Self {
        self.backend(StoreBackend::MongoDb {
            uri: uri.into(),
            database: database.into(),
        })
    }

    pub async fn build(self) -> Result<Arc<dyn PersistenceClient>> {
        let backend = self
            .backend
            .ok_or_else(|| PersistError::Internal("store backend is required".to_string()))?;

        tracing::info!(?backend, "Initializing store");

        let client: Arc<dyn PersistenceClient> = match backend {
            StoreBackend::Memory => Arc::new(MemoryPersistenceClient::new()),
            StoreBackend::Rest { url, api_key } => {
                if url.trim().is_empty() || api_key.trim().is_empty() {
                    return Err(PersistError::Connection(
                        "REST store needs both a URL and an API key".to_string(),
                    ));
                }
                Arc::new(RestPersistenceClient::new(&url, &api_key)?)
            }
            #[cfg(feature = "mongodb")]
            StoreBackend::MongoDb { uri, database } => Arc::new(
                crate::dbs::mongo::MongoPersistenceClient::connect(&uri, &database).await?,
            ),
        };

        Ok(client)
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_requires_backend() {
        let err = PersistClientBuilder::new().build().await.err().unwrap();
        assert!(matches!(err, PersistError::Internal(_)));
    }

    #[tokio::test]
    async fn test_build_memory() {
        let store = PersistClientBuilder::new().memory().build().await.unwrap();
        assert!(store.get_config(1).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_rest_requires_credentials() {
        let err = PersistClientBuilder::new()
            .rest("https://example.supabase.co", "")
            .build()
            .await
            .err()
            .unwrap();
        assert!(matches!(err, PersistError::Connection(_)));
    }

    #[test]
    fn test_backend_debug_hides_key() {
        let backend = StoreBackend::Rest {
            url: "https://example.supabase.co".to_string(),
            api_key: "anon-secret".to_string(),
        };
        assert!(!format!("{:?}", backend).contains("anon-secret"));
    }
}
