use crate::domain::entities::document::StoredDocument;
use crate::domain::error::DomainError;
use crate::domain::ports::document_store::DocumentStore;
use crate::domain::values::retrieval_strategy::RetrievalStrategy;
use crate::domain::values::scored_result::{RankedResultSet, ScoredResult};
use crate::domain::values::similarity::{cosine_similarity, is_finite, magnitude};
use std::sync::Arc;

/// Finds the top-K stored documents for a query vector.
///
/// `Local` ranking lists the whole corpus and scores every vector in process:
/// O(N·D) per query with no index. It exists for stores without native vector
/// search and for small corpora; `Delegated` is the default and should be used
/// whenever the store can rank on its own.
pub struct Retriever {
    store: Arc<dyn DocumentStore>,
    strategy: RetrievalStrategy,
    dimension: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn DocumentStore>, strategy: RetrievalStrategy, dimension: usize) -> Self {
        Self { store, strategy, dimension }
    }

    pub fn strategy(&self) -> RetrievalStrategy {
        self.strategy
    }

    pub async fn retrieve(&self, query_vector: &[f32], k: usize) -> Result<RankedResultSet, DomainError> {
        if query_vector.len() != self.dimension {
            return Err(DomainError::InvalidVector(format!(
                "Query vector has dimension {} but {} is configured",
                query_vector.len(),
                self.dimension
            )));
        }
        if !is_finite(query_vector) {
            return Err(DomainError::InvalidVector("Query vector has non-finite components".into()));
        }
        if magnitude(query_vector) == 0.0 {
            return Err(DomainError::InvalidVector("Query vector has zero magnitude".into()));
        }
        if k == 0 {
            return Ok(vec![]);
        }

        match self.strategy {
            RetrievalStrategy::Delegated if self.store.supports_vector_search() => {
                let results = self.store.search_similar(query_vector, k).await?;
                Ok(results
                    .into_iter()
                    .filter(|r| {
                        if r.content.trim().is_empty() {
                            tracing::warn!("Skipping search hit with empty content");
                            return false;
                        }
                        true
                    })
                    .take(k)
                    .collect())
            }
            strategy => {
                if strategy == RetrievalStrategy::Delegated {
                    tracing::debug!("Store has no native vector search, ranking locally");
                }
                let corpus = self.store.list().await?;
                Ok(rank(query_vector, &corpus, k))
            }
        }
    }
}

/// Score every document against `query`, sort descending and keep the first `k`.
///
/// The sort is stable, so equal scores keep corpus order. Documents that cannot
/// be scored (empty content, wrong dimension, zero vector) are skipped.
pub fn rank(query: &[f32], corpus: &[StoredDocument], k: usize) -> RankedResultSet {
    let mut results: Vec<ScoredResult> = corpus
        .iter()
        .filter_map(|stored| {
            let doc = &stored.document;
            if doc.content.trim().is_empty() {
                tracing::warn!(id = %stored.id, "Skipping document with empty content");
                return None;
            }
            match cosine_similarity(query, &doc.vector) {
                Ok(similarity) => Some(ScoredResult::new(
                    doc.content.clone(),
                    similarity,
                    doc.source_file().map(String::from),
                )),
                Err(e) => {
                    tracing::warn!(id = %stored.id, error = %e, "Skipping unscorable document");
                    None
                }
            }
        })
        .collect();

    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    results.truncate(k);
    results
}
