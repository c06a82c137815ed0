//! Shared test helpers: fake providers and a throwaway HTTP server.

#![allow(dead_code)]

use async_trait::async_trait;
use docrag::application::retriever::rank;
use docrag::domain::entities::document::{Document, StoredDocument};
use docrag::domain::error::DomainError;
use docrag::domain::ports::completion_port::CompletionProvider;
use docrag::domain::ports::document_store::DocumentStore;
use docrag::domain::ports::embedding_port::EmbeddingProvider;
use docrag::domain::values::prompt::Prompt;
use docrag::domain::values::retrieval_strategy::RetrievalStrategy;
use docrag::domain::values::scored_result::ScoredResult;
use docrag::infrastructure::sqlite::document_store::SqliteDocumentStore;
use docrag::{DocRag, PipelineSettings};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Embeds known phrases to fixed vectors, anything else to `fallback`.
pub struct FakeEmbedder {
    pub vectors: HashMap<String, Vec<f32>>,
    pub fallback: Vec<f32>,
    pub calls: AtomicUsize,
}

impl FakeEmbedder {
    pub fn new(fallback: Vec<f32>) -> Self {
        Self {
            vectors: HashMap::new(),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if text.trim().is_empty() {
            return Err(DomainError::InvalidInput("Cannot embed empty text".into()));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vectors.get(text).cloned().unwrap_or_else(|| self.fallback.clone()))
    }

    fn dimension(&self) -> usize {
        self.fallback.len()
    }
}

/// Records every prompt and answers with a canned string.
pub struct FakeCompleter {
    pub answer: String,
    pub prompts: Mutex<Vec<Prompt>>,
}

impl FakeCompleter {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn last_prompt(&self) -> Option<Prompt> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for FakeCompleter {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(self.answer.clone())
    }
}

/// A completion provider that can never be reached.
pub struct UnreachableCompleter;

#[async_trait]
impl CompletionProvider for UnreachableCompleter {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, DomainError> {
        Err(DomainError::provider("OpenAI completions unreachable: connection refused", true))
    }
}

/// In-memory store that claims native vector search, counting how it is used.
#[derive(Default)]
pub struct NativeSearchStore {
    pub documents: Mutex<Vec<StoredDocument>>,
    pub searches: AtomicUsize,
    pub lists: AtomicUsize,
}

#[async_trait]
impl DocumentStore for NativeSearchStore {
    async fn insert(&self, document: &Document) -> Result<String, DomainError> {
        let mut docs = self.documents.lock().unwrap();
        let id = format!("doc-{}", docs.len());
        docs.push(StoredDocument {
            id: id.clone(),
            document: document.clone(),
            created_at: None,
        });
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, DomainError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        Ok(self.documents.lock().unwrap().clone())
    }

    fn supports_vector_search(&self) -> bool {
        true
    }

    async fn search_similar(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredResult>, DomainError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(rank(vector, &self.documents.lock().unwrap(), limit))
    }
}

pub fn memory_store() -> Arc<SqliteDocumentStore> {
    Arc::new(SqliteDocumentStore::new(Connection::open_in_memory().unwrap()).unwrap())
}

pub fn settings(retrieval: RetrievalStrategy) -> PipelineSettings {
    PipelineSettings {
        retrieval,
        ..Default::default()
    }
}

/// SQLite-backed pipeline with 3-dimensional fake embeddings.
pub fn setup(embedder: FakeEmbedder, completer: Arc<dyn CompletionProvider>) -> DocRag {
    DocRag::with_providers(
        memory_store(),
        Arc::new(embedder),
        completer,
        settings(RetrievalStrategy::Local),
    )
}

pub fn doc_json(content: &str, vector: &[f32], file_path: Option<&str>) -> Vec<u8> {
    let mut doc = serde_json::json!({ "content": content, "vector": vector });
    if let Some(path) = file_path {
        doc["metadata"] = serde_json::json!({ "file_path": path });
    }
    serde_json::to_vec(&doc).unwrap()
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: axum::Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
