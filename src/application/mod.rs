pub mod find;
pub mod insert_document;
pub mod prompt_assembler;
pub mod retriever;
