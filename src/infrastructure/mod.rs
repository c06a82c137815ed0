pub mod astra;
pub mod completions;
pub mod embeddings;
pub mod http;
pub mod sqlite;
