use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }
}

/// Input for the language model, either a single instruction block for
/// completion-style endpoints or a chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Text(String),
    Chat(Vec<ChatMessage>),
}

impl Prompt {
    pub fn style(&self) -> PromptStyle {
        match self {
            Prompt::Text(_) => PromptStyle::Instruction,
            Prompt::Chat(_) => PromptStyle::Chat,
        }
    }

    /// Output-token budget for the generated answer.
    pub fn max_tokens(&self) -> u32 {
        match self {
            Prompt::Text(_) => 1500,
            Prompt::Chat(_) => 200,
        }
    }

    pub fn temperature(&self) -> f32 {
        0.7
    }

    /// Flattened text, mostly for logging and assertions.
    pub fn as_text(&self) -> String {
        match self {
            Prompt::Text(text) => text.clone(),
            Prompt::Chat(messages) => messages
                .iter()
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    #[default]
    Chat,
    Instruction,
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStyle::Chat => write!(f, "chat"),
            PromptStyle::Instruction => write!(f, "instruction"),
        }
    }
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat" => Ok(PromptStyle::Chat),
            "instruction" | "completion" => Ok(PromptStyle::Instruction),
            _ => Err(format!("Unknown prompt style: {s}")),
        }
    }
}
