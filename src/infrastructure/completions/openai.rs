use crate::domain::error::DomainError;
use crate::domain::ports::completion_port::CompletionProvider;
use crate::domain::values::prompt::{ChatMessage, Prompt};
use crate::infrastructure::http::{parse_error, request_error, status_error, RetryPolicy};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "OpenAI completions";

/// Answers chat prompts through `/v1/chat/completions` and instruction prompts
/// through the legacy `/v1/completions` endpoint.
pub struct OpenAiCompleter {
    client: Client,
    api_key: String,
    chat_model: String,
    completion_model: String,
    base_url: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl OpenAiCompleter {
    pub fn new(
        client: Client,
        api_key: String,
        chat_model: Option<String>,
        completion_model: Option<String>,
        base_url: Option<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            api_key,
            chat_model: chat_model.unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            completion_model: completion_model.unwrap_or_else(|| "gpt-3.5-turbo-instruct".to_string()),
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com".to_string()),
            retry,
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, DomainError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(PROVIDER, status, &body));
        }

        resp.json().await.map_err(|e| parse_error(PROVIDER, e))
    }

    async fn request(&self, prompt: &Prompt) -> Result<String, DomainError> {
        let text = match prompt {
            Prompt::Chat(messages) => {
                let resp: ChatResponse = self
                    .post(
                        "/v1/chat/completions",
                        &ChatRequest {
                            model: &self.chat_model,
                            messages,
                            max_tokens: prompt.max_tokens(),
                            temperature: prompt.temperature(),
                        },
                    )
                    .await?;
                resp.choices.into_iter().next().and_then(|c| c.message.content)
            }
            Prompt::Text(text) => {
                let resp: CompletionResponse = self
                    .post(
                        "/v1/completions",
                        &CompletionRequest {
                            model: &self.completion_model,
                            prompt: text,
                            max_tokens: prompt.max_tokens(),
                            temperature: prompt.temperature(),
                        },
                    )
                    .await?;
                resp.choices.into_iter().next().map(|c| c.text)
            }
        };

        match text.map(|t| t.trim().to_string()) {
            Some(answer) if !answer.is_empty() => Ok(answer),
            _ => Err(DomainError::provider(format!("{PROVIDER} returned an empty answer"), false)),
        }
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OpenAiCompleter {
    async fn complete(&self, prompt: &Prompt) -> Result<String, DomainError> {
        self.retry.run(PROVIDER, || self.request(prompt)).await
    }
}
