use crate::domain::entities::document::Document;
use crate::domain::error::DomainError;
use crate::domain::ports::document_store::DocumentStore;
use std::sync::Arc;

pub struct InsertDocumentUseCase {
    store: Arc<dyn DocumentStore>,
    dimension: usize,
}

impl InsertDocumentUseCase {
    pub fn new(store: Arc<dyn DocumentStore>, dimension: usize) -> Self {
        Self { store, dimension }
    }

    /// Parse, validate and store a raw JSON document. Nothing is written unless
    /// every check passes.
    pub async fn execute(&self, payload: &[u8]) -> Result<String, DomainError> {
        let document = Document::from_json(payload)?;
        self.insert(&document).await
    }

    pub async fn insert(&self, document: &Document) -> Result<String, DomainError> {
        document.validate(self.dimension)?;
        let id = self.store.insert(document).await?;
        tracing::info!(%id, source = document.source_file().unwrap_or("-"), "Document inserted");
        Ok(id)
    }
}
