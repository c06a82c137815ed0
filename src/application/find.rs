use crate::application::prompt_assembler::PromptAssembler;
use crate::application::retriever::Retriever;
use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::ports::embedding_port::EmbeddingProvider;
use crate::domain::values::scored_result::RankedResultSet;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_QUERY: &str = "What are the water-related disclosures in the BRSR?";
pub const MAX_LIMIT: usize = 50;

#[derive(Debug, Serialize)]
pub struct FindOutcome {
    pub answer: String,
    pub results: RankedResultSet,
}

/// Embed → retrieve → assemble → complete. Any failing stage aborts the request.
pub struct FindUseCase {
    embedder: Arc<dyn EmbeddingProvider>,
    retriever: Retriever,
    assembler: PromptAssembler,
    completer: Arc<dyn CompletionProvider>,
    top_k: usize,
}

impl FindUseCase {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        retriever: Retriever,
        assembler: PromptAssembler,
        completer: Arc<dyn CompletionProvider>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            retriever,
            assembler,
            completer,
            top_k,
        }
    }

    pub async fn execute(&self, query: &str, limit: Option<usize>) -> Result<FindOutcome, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DomainError::InvalidInput("Query is empty".into()));
        }
        let k = limit.unwrap_or(self.top_k).min(MAX_LIMIT);

        let vector = self.embedder.embed(query).await?;
        let results = self.retriever.retrieve(&vector, k).await?;
        tracing::debug!(
            hits = results.len(),
            strategy = %self.retriever.strategy(),
            prompt_style = %self.assembler.style(),
            "Retrieved documents"
        );

        let prompt = self.assembler.assemble(query, &results);
        let answer = self.completer.complete(&prompt).await?;

        Ok(FindOutcome { answer, results })
    }
}
