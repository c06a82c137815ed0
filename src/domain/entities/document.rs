use crate::domain::error::DomainError;
use crate::domain::values::similarity::{is_finite, magnitude};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form metadata attached at ingestion time. Only `file_path` is interpreted;
/// every other field is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub vector: Vec<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DocumentMetadata>,
}

impl Document {
    pub fn new(content: impl Into<String>, vector: Vec<f32>, metadata: Option<DocumentMetadata>) -> Self {
        Self {
            content: content.into(),
            vector,
            metadata,
        }
    }

    /// Parse an ingestion payload. Shape errors surface as `InvalidInput`.
    pub fn from_json(payload: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(payload)
            .map_err(|e| DomainError::InvalidInput(format!("Malformed document: {e}")))
    }

    pub fn source_file(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.file_path.as_deref())
    }

    /// Checks everything a store needs before accepting the document.
    pub fn validate(&self, dimension: usize) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::InvalidInput("Document content is empty".into()));
        }
        if self.vector.len() != dimension {
            return Err(DomainError::InvalidVector(format!(
                "Document vector has dimension {} but {} is configured",
                self.vector.len(),
                dimension
            )));
        }
        if !is_finite(&self.vector) {
            return Err(DomainError::InvalidVector("Document vector has non-finite components".into()));
        }
        if magnitude(&self.vector) == 0.0 {
            return Err(DomainError::InvalidVector("Document vector has zero magnitude".into()));
        }
        Ok(())
    }
}

/// A document as read back from a store.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub document: Document,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_component_rejected() {
        // 1e39 overflows f32 and parses as infinity.
        let doc = Document::from_json(br#"{"content":"huge","vector":[1e39,0,0]}"#).unwrap();
        assert!(doc.vector[0].is_infinite());
        assert!(matches!(doc.validate(3), Err(DomainError::InvalidVector(_))));
    }

    #[test]
    fn test_valid_document() {
        let doc = Document::from_json(
            br#"{"content":"Water disclosure section 4.2","vector":[1,0,0],"metadata":{"file_path":"brsr.pdf"}}"#,
        )
        .unwrap();
        assert!(doc.validate(3).is_ok());
        assert_eq!(doc.source_file(), Some("brsr.pdf"));
    }

    #[test]
    fn test_missing_content_is_invalid_input() {
        let err = Document::from_json(br#"{"vector":[1,0,0]}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }
}
