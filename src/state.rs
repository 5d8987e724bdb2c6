use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::config::Config;
use crate::llm::OpenAiCompatibleClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub backend: Arc<OpenAiCompatibleClient>,
    pub client_contexts: Arc<DashMap<String, ClientContext>>,
}

#[derive(Clone)]
pub struct ClientContext {
    pub client_uid: String,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            backend: Arc::new(OpenAiCompatibleClient::new()),
            client_contexts: Arc::new(DashMap::new()),
        }
    }

    pub fn generate_client_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
