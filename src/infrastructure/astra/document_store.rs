use crate::domain::entities::document::{Document, DocumentMetadata, StoredDocument};
use crate::domain::error::DomainError;
use crate::domain::ports::document_store::DocumentStore;
use crate::domain::values::scored_result::ScoredResult;
use crate::infrastructure::http::{parse_error, request_error, status_error, RetryPolicy};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

const PROVIDER: &str = "Astra DB";
/// Upper bound on pages fetched while listing, at 20 documents per page.
const MAX_LIST_PAGES: usize = 500;

/// Document store backed by the Astra DB JSON Data API.
pub struct AstraDocumentStore {
    client: Client,
    token: String,
    collection_url: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    data: Option<FindData>,
    #[serde(default)]
    errors: Vec<ApiError>,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct FindData {
    #[serde(default)]
    documents: Vec<AstraDocument>,
    #[serde(rename = "nextPageState", default)]
    next_page_state: Option<String>,
}

#[derive(Deserialize)]
struct AstraDocument {
    #[serde(rename = "_id", default)]
    id: Value,
    #[serde(default)]
    content: Option<String>,
    #[serde(rename = "$vector", default)]
    native_vector: Option<Vec<f32>>,
    /// Documents written verbatim by older ingestion keep their embedding here.
    #[serde(default)]
    vector: Option<Vec<f32>>,
    #[serde(default)]
    metadata: Option<DocumentMetadata>,
    #[serde(rename = "$similarity", default)]
    similarity: Option<f64>,
}

impl AstraDocument {
    fn id_string(&self) -> String {
        match &self.id {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl AstraDocumentStore {
    pub fn new(
        client: Client,
        endpoint: &str,
        token: String,
        keyspace: &str,
        collection: &str,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            client,
            token,
            collection_url: format!(
                "{}/api/json/v1/{}/{}",
                endpoint.trim_end_matches('/'),
                keyspace,
                collection
            ),
            retry,
        }
    }

    async fn command(&self, body: &Value) -> Result<ApiResponse, DomainError> {
        let resp = self
            .client
            .post(&self.collection_url)
            .header("Token", &self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(PROVIDER, status, &body));
        }

        let parsed: ApiResponse = resp.json().await.map_err(|e| parse_error(PROVIDER, e))?;
        // The Data API reports command failures in the body of a 200 response.
        if !parsed.errors.is_empty() {
            let messages: Vec<_> = parsed.errors.iter().map(|e| e.message.as_str()).collect();
            return Err(DomainError::provider(format!("{PROVIDER}: {}", messages.join("; ")), false));
        }
        Ok(parsed)
    }

    async fn read(&self, body: Value) -> Result<ApiResponse, DomainError> {
        self.retry
            .run(PROVIDER, || self.command(&body))
            .await
            .map_err(into_storage)
    }
}

fn into_storage(e: DomainError) -> DomainError {
    match e {
        DomainError::Provider { message, .. } => DomainError::Storage(message),
        other => other,
    }
}

/// Astra scores cosine similarity as `(1 + cos) / 2`; map it back to [-1, 1].
pub fn denormalize_similarity(score: f64) -> f64 {
    (2.0 * score - 1.0).clamp(-1.0, 1.0)
}

#[async_trait::async_trait]
impl DocumentStore for AstraDocumentStore {
    async fn insert(&self, document: &Document) -> Result<String, DomainError> {
        let mut doc = json!({
            "content": document.content,
            "$vector": document.vector
        });
        if let Some(metadata) = &document.metadata {
            doc["metadata"] = serde_json::to_value(metadata)
                .map_err(|e| DomainError::InvalidInput(format!("Unserializable metadata: {e}")))?;
        }

        // Not retried: a timed-out insert may still have landed.
        let resp = self
            .command(&json!({ "insertOne": { "document": doc } }))
            .await
            .map_err(into_storage)?;

        let id = resp
            .status
            .as_ref()
            .and_then(|s| s.get("insertedIds"))
            .and_then(|ids| ids.get(0))
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .ok_or_else(|| DomainError::Storage(format!("{PROVIDER} did not confirm the insert")))?;
        Ok(id)
    }

    async fn list(&self) -> Result<Vec<StoredDocument>, DomainError> {
        let mut documents = Vec::new();
        let mut page_state: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let mut options = json!({});
            if let Some(state) = &page_state {
                options["pageState"] = json!(state);
            }
            let resp = self
                .read(json!({
                    "find": {
                        "filter": {},
                        "projection": { "content": 1, "metadata": 1, "vector": 1, "$vector": 1 },
                        "options": options
                    }
                }))
                .await?;

            let Some(data) = resp.data else {
                return Ok(documents);
            };
            for raw in data.documents {
                let id = raw.id_string();
                let vector = raw.native_vector.or(raw.vector);
                match (raw.content, vector) {
                    (Some(content), Some(vector)) => documents.push(StoredDocument {
                        id,
                        document: Document::new(content, vector, raw.metadata),
                        created_at: None,
                    }),
                    _ => tracing::warn!(%id, "Skipping stored document without content or vector"),
                }
            }

            page_state = data.next_page_state;
            if page_state.is_none() {
                return Ok(documents);
            }
        }

        tracing::warn!(pages = MAX_LIST_PAGES, "Stopped listing collection at page limit");
        Ok(documents)
    }

    fn supports_vector_search(&self) -> bool {
        true
    }

    async fn search_similar(&self, vector: &[f32], limit: usize) -> Result<Vec<ScoredResult>, DomainError> {
        let resp = self
            .read(json!({
                "find": {
                    "sort": { "$vector": vector },
                    "projection": { "content": 1, "metadata": 1 },
                    "options": { "limit": limit, "includeSimilarity": true }
                }
            }))
            .await?;

        let documents = resp.data.map(|d| d.documents).unwrap_or_default();
        Ok(documents
            .into_iter()
            .filter_map(|raw| {
                let id = raw.id_string();
                let Some(content) = raw.content else {
                    tracing::warn!(%id, "Skipping search hit without content");
                    return None;
                };
                let Some(score) = raw.similarity else {
                    tracing::warn!(%id, "Skipping search hit without similarity");
                    return None;
                };
                let similarity = denormalize_similarity(score);
                let source_file = raw.metadata.and_then(|m| m.file_path);
                Some(ScoredResult::new(content, similarity, source_file))
            })
            .collect())
    }
}
