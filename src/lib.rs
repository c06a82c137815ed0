pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod server;

use crate::application::find::{FindOutcome, FindUseCase};
use crate::application::insert_document::InsertDocumentUseCase;
use crate::application::prompt_assembler::PromptAssembler;
use crate::application::retriever::Retriever;
use crate::config::{Config, StoreBackend};
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::document_store::DocumentStore;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::prompt::PromptStyle;
use crate::domain::values::retrieval_strategy::RetrievalStrategy;
use crate::infrastructure::astra::document_store::AstraDocumentStore;
use crate::infrastructure::completions::openai::OpenAiCompleter;
use crate::infrastructure::embeddings::openai::OpenAiEmbedder;
use crate::infrastructure::http::{build_client, RetryPolicy};
use crate::infrastructure::sqlite::document_store::SqliteDocumentStore;
use std::sync::Arc;
use std::time::Duration;

/// Pipeline knobs that do not depend on which providers are plugged in.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub retrieval: RetrievalStrategy,
    pub prompt_style: PromptStyle,
    pub top_k: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            retrieval: RetrievalStrategy::default(),
            prompt_style: PromptStyle::default(),
            top_k: 5,
        }
    }
}

pub struct DocRag {
    insert_uc: InsertDocumentUseCase,
    find_uc: FindUseCase,
}

impl DocRag {
    /// Build the production providers described by `config`.
    pub fn new(config: &Config) -> Result<Self, DomainError> {
        let client = build_client(config.request_timeout)?;
        let retry = RetryPolicy {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(250),
        };

        let store: Arc<dyn DocumentStore> = match (config.store, &config.astra) {
            (StoreBackend::Astra, Some(astra)) => Arc::new(AstraDocumentStore::new(
                client.clone(),
                &astra.endpoint,
                astra.token.clone(),
                &astra.keyspace,
                &config.collection,
                retry,
            )),
            (StoreBackend::Astra, None) => {
                return Err(DomainError::Config("Astra store selected without Astra settings".into()))
            }
            (StoreBackend::Sqlite, _) => Arc::new(SqliteDocumentStore::open(&config.db_path)?),
        };

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(OpenAiEmbedder::new(
            client.clone(),
            config.openai_api_key.clone(),
            Some(config.embedding_model.clone()),
            Some(config.openai_base_url.clone()),
            config.embedding_dimension,
            retry,
        ));
        let completer: Arc<dyn CompletionProvider> = Arc::new(OpenAiCompleter::new(
            client,
            config.openai_api_key.clone(),
            Some(config.chat_model.clone()),
            Some(config.completion_model.clone()),
            Some(config.openai_base_url.clone()),
            retry,
        ));

        tracing::info!(
            store = %config.store,
            retrieval = %config.retrieval,
            prompt_style = %config.prompt_style,
            dimension = config.embedding_dimension,
            "Providers initialized"
        );

        Ok(Self::with_providers(
            store,
            embedder,
            completer,
            PipelineSettings {
                retrieval: config.retrieval,
                prompt_style: config.prompt_style,
                top_k: config.top_k,
            },
        ))
    }

    /// Wire the pipeline around caller-supplied providers. The embedder's
    /// dimension becomes the dimension every stored and query vector must have.
    pub fn with_providers(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        completer: Arc<dyn CompletionProvider>,
        settings: PipelineSettings,
    ) -> Self {
        let dimension = embedder.dimension();
        let retriever = Retriever::new(store.clone(), settings.retrieval, dimension);
        Self {
            insert_uc: InsertDocumentUseCase::new(store, dimension),
            find_uc: FindUseCase::new(
                embedder,
                retriever,
                PromptAssembler::new(settings.prompt_style),
                completer,
                settings.top_k,
            ),
        }
    }

    pub async fn insert(&self, payload: &[u8]) -> Result<String, DomainError> {
        self.insert_uc.execute(payload).await
    }

    pub async fn find(&self, query: &str, limit: Option<usize>) -> Result<FindOutcome, DomainError> {
        self.find_uc.execute(query, limit).await
    }
}
