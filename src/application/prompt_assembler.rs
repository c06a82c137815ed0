use crate::domain::values::prompt::{ChatMessage, Prompt, PromptStyle};
use crate::domain::values::scored_result::ScoredResult;

pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant documents found.";
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

pub struct PromptAssembler {
    style: PromptStyle,
}

impl PromptAssembler {
    pub fn new(style: PromptStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> PromptStyle {
        self.style
    }

    pub fn assemble(&self, query: &str, results: &[ScoredResult]) -> Prompt {
        match self.style {
            PromptStyle::Instruction => Prompt::Text(instruction_prompt(query, results)),
            PromptStyle::Chat => Prompt::Chat(vec![
                ChatMessage::system(SYSTEM_INSTRUCTION),
                ChatMessage::user(chat_user_message(query, results)),
            ]),
        }
    }
}

fn instruction_prompt(query: &str, results: &[ScoredResult]) -> String {
    let content = if results.is_empty() {
        NO_RELEVANT_DOCUMENTS.to_string()
    } else {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {}", i + 1, r.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    format!(
        "Extract and summarize key information from the document. The database contains the relevant information to answer the question asked.\n\n\
         Relevant Content:\n{content}\n\n\
         Question:\n{query}\n\n\
         Please provide a detailed and accurate answer based on the available content."
    )
}

fn chat_user_message(query: &str, results: &[ScoredResult]) -> String {
    let listing = if results.is_empty() {
        NO_RELEVANT_DOCUMENTS.to_string()
    } else {
        results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("{}. {} (Similarity: {:.2})", i + 1, r.content, r.similarity))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!("User asked: \"{query}\". Here are the similar ideas fetched from the database:\n\n{listing}")
}
