use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the retriever ranks the corpus against a query vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    /// Hand ranking to the store's native vector search.
    #[default]
    Delegated,
    /// Fetch every stored vector and rank in process.
    Local,
}

impl fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetrievalStrategy::Delegated => write!(f, "delegated"),
            RetrievalStrategy::Local => write!(f, "local"),
        }
    }
}

impl FromStr for RetrievalStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delegated" | "native" => Ok(RetrievalStrategy::Delegated),
            "local" | "manual" => Ok(RetrievalStrategy::Local),
            _ => Err(format!("Unknown retrieval strategy: {s}")),
        }
    }
}
