use serde::{Deserialize, Serialize};

/// One retrieved document with its similarity to the query. Lives for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResult {
    pub content: String,
    /// Cosine similarity in [-1, 1].
    pub similarity: f64,
    #[serde(rename = "fileName", default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl ScoredResult {
    pub fn new(content: impl Into<String>, similarity: f64, source_file: Option<String>) -> Self {
        Self {
            content: content.into(),
            similarity,
            source_file,
        }
    }
}

/// Results ordered by non-increasing similarity, truncated to top-K.
pub type RankedResultSet = Vec<ScoredResult>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_file_name_when_present() {
        let r = ScoredResult::new("Water disclosure", 0.5, Some("brsr.pdf".into()));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["fileName"], "brsr.pdf");
        assert_eq!(json["content"], "Water disclosure");
    }

    #[test]
    fn test_omits_file_name_when_absent() {
        let r = ScoredResult::new("Energy", 0.1, None);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("fileName").is_none());
    }
}
