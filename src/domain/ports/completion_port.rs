use crate::domain::error::DomainError;
use crate::domain::values::prompt::Prompt;

#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate an answer for the prompt and return it trimmed.
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError>;
}
