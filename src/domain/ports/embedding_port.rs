use crate::domain::error::DomainError;

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one piece of text. Implementations must reject empty input
    /// without calling out.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Vector length produced by `embed`, fixed for the process lifetime.
    fn dimension(&self) -> usize;
}
