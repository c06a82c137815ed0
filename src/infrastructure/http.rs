//! Shared plumbing for provider adapters: client construction, error
//! classification and bounded retry.

use crate::domain::error::DomainError;
use reqwest::{Client, StatusCode};
use std::future::Future;
use std::time::Duration;

pub fn build_client(timeout: Duration) -> Result<Client, DomainError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| DomainError::Config(format!("HTTP client error: {e}")))
}

/// Map a transport failure. Timeouts and connection problems are transient.
pub fn request_error(provider: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::Timeout(format!("{provider} request timed out"))
    } else if e.is_connect() || e.is_request() {
        DomainError::provider(format!("{provider} unreachable: {e}"), true)
    } else {
        DomainError::provider(format!("{provider} API error: {e}"), false)
    }
}

/// Map a non-success HTTP status.
pub fn status_error(provider: &str, status: StatusCode, body: &str) -> DomainError {
    let retryable = status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
        || status.is_server_error();
    DomainError::provider(format!("{provider} API {status}: {body}"), retryable)
}

pub fn parse_error(provider: &str, e: impl std::fmt::Display) -> DomainError {
    DomainError::provider(format!("{provider} response parse error: {e}"), false)
}

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1 << attempt.min(8))
    }

    /// Run `op`, retrying retryable failures with exponential backoff.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        error = %e,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        "{label} failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
