use std::sync::Arc;

use crate::chat::repository::KvConversationRepository;
use crate::chat::service::ChatService;
use crate::config::Config;
use crate::llm_client::ChatCompletion;
use crate::resume::draft::DraftStore;
use crate::storage::KvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. Default: `LlmClient` (OpenRouter). Tests use a fake.
    pub llm: Arc<dyn ChatCompletion>,
    pub chat: Arc<ChatService>,
    pub drafts: DraftStore,
    pub config: Config,
}

impl AppState {
    pub fn new(llm: Arc<dyn ChatCompletion>, store: Arc<dyn KvStore>, config: Config) -> Self {
        let repository = Arc::new(KvConversationRepository::new(store.clone()));
        Self {
            llm,
            chat: Arc::new(ChatService::new(repository)),
            drafts: DraftStore::new(store),
            config,
        }
    }
}
