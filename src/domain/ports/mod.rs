pub mod completion_port;
pub mod document_store;
pub mod embedding_port;
