use crate::application::find::{FindOutcome, DEFAULT_QUERY};
use crate::domain::error::DomainError;
use crate::server::error::ApiError;
use crate::DocRag;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct FindParams {
    pub query: Option<String>,
    pub limit: Option<String>,
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn insert(State(app): State<Arc<DocRag>>, body: Bytes) -> Result<&'static str, ApiError> {
    app.insert(&body).await.map_err(ApiError::Insert)?;
    Ok("Document inserted successfully")
}

pub async fn find(
    State(app): State<Arc<DocRag>>,
    Query(params): Query<FindParams>,
) -> Result<Json<FindOutcome>, ApiError> {
    let limit = params
        .limit
        .as_deref()
        .map(|raw| {
            raw.parse::<usize>()
                .map_err(|_| DomainError::InvalidInput(format!("Invalid limit: {raw}")))
        })
        .transpose()
        .map_err(ApiError::Find)?;
    let query = params.query.as_deref().unwrap_or(DEFAULT_QUERY);

    let outcome = app.find(query, limit).await.map_err(ApiError::Find)?;
    Ok(Json(outcome))
}
