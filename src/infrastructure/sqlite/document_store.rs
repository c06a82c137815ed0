use crate::domain::entities::document::{Document, DocumentMetadata, StoredDocument};
use crate::domain::error::DomainError;
use crate::domain::ports::document_store::DocumentStore;
use crate::domain::values::scored_result::ScoredResult;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

/// Local document store. Has no vector index, so retrieval always ranks in process.
pub struct SqliteDocumentStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteDocumentStore {
    pub fn open(path: &str) -> Result<Self, DomainError> {
        let conn = Connection::open(path).map_err(|e| DomainError::Storage(format!("DB error: {e}")))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::Storage(format!("WAL error: {e}")))?;
        Self::new(conn)
    }

    pub fn new(conn: Connection) -> Result<Self, DomainError> {
        run_migrations(&conn).map_err(DomainError::Storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    /// Decode an f32 LE blob. A length that is not a multiple of 4 is corrupt.
    fn deserialize_vector(bytes: &[u8]) -> Option<Vec<f32>> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        Some(
            bytes
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }

    fn row_to_document(row: &rusqlite::Row) -> Result<StoredDocument, rusqlite::Error> {
        let id: String = row.get(0)?;
        let blob: Vec<u8> = row.get(2)?;
        let vector = Self::deserialize_vector(&blob).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Blob,
                format!("vector blob of {} bytes for document {id} is not a multiple of 4", blob.len()).into(),
            )
        })?;
        let metadata_str: Option<String> = row.get(3)?;
        let created_str: String = row.get(4)?;

        let metadata = metadata_str.and_then(|s| {
            serde_json::from_str::<DocumentMetadata>(&s)
                .map_err(|e| tracing::warn!(%id, error = %e, "Unreadable metadata, dropping it"))
                .ok()
        });

        Ok(StoredDocument {
            document: Document {
                content: row.get(1)?,
                vector,
                metadata,
            },
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&Utc))
                .ok(),
            id,
        })
    }

    /// Run a closure against the connection off the async runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, DomainError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|e| DomainError::Storage(e.to_string()))?;
            f(&*guard)
        })
        .await
        .map_err(|e| DomainError::Storage(format!("Storage task failed: {e}")))?
    }
}

#[async_trait::async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn insert(&self, document: &Document) -> Result<String, DomainError> {
        let id = uuid::Uuid::new_v4().to_string();
        let blob = Self::serialize_vector(&document.vector);
        let content = document.content.clone();
        let metadata = document
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| DomainError::InvalidInput(format!("Unserializable metadata: {e}")))?;
        let created_at = Utc::now().to_rfc3339();

        let row_id = id.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO documents (id, content, vector, metadata, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![row_id, content, blob, metadata, created_at],
            )
            .map_err(|e| DomainError::Storage(format!("Failed to insert document: {e}")))?;
            Ok(())
        })
        .await?;
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, DomainError> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, content, vector, metadata, created_at FROM documents ORDER BY rowid")
                .map_err(|e| DomainError::Storage(e.to_string()))?;
            let rows = stmt
                .query_map([], Self::row_to_document)
                .map_err(|e| DomainError::Storage(e.to_string()))?;
            let mut documents = Vec::new();
            for row in rows {
                match row {
                    Ok(doc) => documents.push(doc),
                    Err(e) => tracing::warn!(error = %e, "Skipping unreadable document row"),
                }
            }
            Ok(documents)
        })
        .await
    }

    fn supports_vector_search(&self) -> bool {
        false
    }

    async fn search_similar(&self, _vector: &[f32], _limit: usize) -> Result<Vec<ScoredResult>, DomainError> {
        Err(DomainError::Storage("SQLite store has no native vector search".into()))
    }
}
