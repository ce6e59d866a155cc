use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::Config;
use crate::llm_client::{LlmClient, LlmError};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Built on the first report request so the service can start without an API key.
    llm: Arc<OnceCell<LlmClient>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            llm: Arc::new(OnceCell::new()),
        }
    }

    /// Returns the shared client, constructing it at most once across concurrent callers.
    pub async fn llm(&self) -> Result<&LlmClient, LlmError> {
        self.llm
            .get_or_try_init(|| async {
                let client = LlmClient::from_config(&self.config)?;
                tracing::info!("LLM client initialized (model: {})", client.model());
                Ok::<_, LlmError>(client)
            })
            .await
    }
}
