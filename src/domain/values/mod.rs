pub mod prompt;
pub mod retrieval_strategy;
pub mod scored_result;
pub mod similarity;
