//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both the CLI and
//! the REST API. Services are generic over repository traits; AppState pins
//! them to the SQLite implementations.

use std::path::Path;
use std::sync::Arc;

use mindful_core::chat::relay::{ChatRelay, RelaySettings};
use mindful_core::forum::service::ForumService;
use mindful_core::llm::box_provider::BoxLlmProvider;
use mindful_infra::config::database_url;
use mindful_infra::llm::create_provider;
use mindful_infra::sqlite::chat::SqliteChatRepository;
use mindful_infra::sqlite::forum::SqliteForumRepository;
use mindful_infra::sqlite::pool::DatabasePool;
use mindful_types::config::{LlmConfig, ServerConfig};

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteChatRelay = ChatRelay<SqliteChatRepository>;

pub type ConcreteForumService = ForumService<SqliteForumRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_relay: Arc<ConcreteChatRelay>,
    pub forum_service: Arc<ConcreteForumService>,
}

impl AppState {
    /// Initialize the application state: open the database, pick the model
    /// provider, wire services.
    pub async fn init(
        config: &ServerConfig,
        data_dir: &Path,
        api_key: Option<&str>,
    ) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;

        let db_url = database_url(config, data_dir);
        let db_pool = DatabasePool::new(&db_url).await?;
        tracing::debug!(url = %db_url, "Database opened");

        let provider = create_provider(&config.llm, api_key)?;

        Ok(Self::from_parts(db_pool, provider, &config.llm))
    }

    /// Wire services over an already-open pool and provider.
    pub fn from_parts(db_pool: DatabasePool, provider: BoxLlmProvider, llm: &LlmConfig) -> Self {
        let chat_relay = ChatRelay::new(
            SqliteChatRepository::new(db_pool.clone()),
            provider,
            RelaySettings::from(llm),
        );
        let forum_service = ForumService::new(SqliteForumRepository::new(db_pool));

        Self {
            chat_relay: Arc::new(chat_relay),
            forum_service: Arc::new(forum_service),
        }
    }
}
