use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    #[error("Provider error: {message}")]
    Provider { message: String, retryable: bool },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn provider(message: impl Into<String>, retryable: bool) -> Self {
        DomainError::Provider {
            message: message.into(),
            retryable,
        }
    }

    /// Timeouts and transient provider failures may be retried; everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            DomainError::Timeout(_) => true,
            DomainError::Provider { retryable, .. } => *retryable,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(DomainError::Timeout("slow".into()).is_retryable());
        assert!(DomainError::provider("429", true).is_retryable());
        assert!(!DomainError::provider("401", false).is_retryable());
        assert!(!DomainError::InvalidInput("empty".into()).is_retryable());
        assert!(!DomainError::Storage("down".into()).is_retryable());
        assert!(!DomainError::InvalidVector("zero".into()).is_retryable());
    }

    #[test]
    fn test_provider_display_hides_flag() {
        let err = DomainError::provider("OpenAI API 500: boom", true);
        assert_eq!(err.to_string(), "Provider error: OpenAI API 500: boom");
    }
}
