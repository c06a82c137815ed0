use crate::domain::entities::document::{Document, StoredDocument};
use crate::domain::error::DomainError;
use crate::domain::values::scored_result::ScoredResult;

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store a document and return the id the store assigned to it.
    async fn insert(&self, document: &Document) -> Result<String, DomainError>;

    /// Every stored document, in insertion order.
    async fn list(&self) -> Result<Vec<StoredDocument>, DomainError>;

    /// Whether `search_similar` is backed by a native vector index.
    fn supports_vector_search(&self) -> bool;

    /// Native top-`limit` similarity search with cosine scores in [-1, 1].
    async fn search_similar(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredResult>, DomainError>;
}
