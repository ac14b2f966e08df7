//! Shared file route handlers.
//!
//! Shared files (brochures, price lists) pair a blob in object storage with
//! a metadata document. Upload and delete are admin-only; listing is public.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use lookbook_core::FileId;

use crate::backend::collections;
use crate::error::{AppError, Result};
use crate::models::catalog::SharedFile;
use crate::state::AppState;

use super::admin::require_admin;

/// Query parameters for a file upload.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub title: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

fn default_content_type() -> String {
    "application/octet-stream".to_owned()
}

/// List all shared files.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<SharedFile>>> {
    let files: Vec<SharedFile> = state
        .documents()
        .list(collections::FILES, Some("uploaded_at"))
        .await?;
    Ok(Json(files))
}

/// A freshly resolved download URL for a shared file.
#[derive(Debug, Serialize)]
pub struct DownloadView {
    pub url: String,
}

/// Resolve a fresh download URL for a shared file's blob.
///
/// The stored record carries the URL from upload time; this asks object
/// storage for a current one, so links keep working after the stored URL
/// goes stale.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DownloadView>> {
    let file: SharedFile = state
        .documents()
        .get(collections::FILES, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("file {id}")))?;

    let url = state
        .blobs()
        .download_url(&format!("files/{}", file.id.as_str()))
        .await?;
    Ok(Json(DownloadView { url }))
}

/// Upload a shared file: blob first, then the metadata record pointing at it.
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<SharedFile>)> {
    require_admin(&state)?;
    if query.title.trim().is_empty() {
        return Err(AppError::BadRequest("title is required".to_owned()));
    }
    if body.is_empty() {
        return Err(AppError::BadRequest("file body is empty".to_owned()));
    }

    let url = state
        .blobs()
        .upload(&format!("files/{id}"), body.to_vec(), &query.content_type)
        .await?;

    let file = SharedFile {
        id: FileId::new(id),
        title: query.title,
        url,
        content_type: Some(query.content_type),
        uploaded_at: Some(chrono::Utc::now()),
    };
    state
        .documents()
        .create(collections::FILES, file.id.as_str(), &file)
        .await?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// Delete a shared file's record and blob.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    require_admin(&state)?;

    state.documents().delete(collections::FILES, &id).await?;
    if let Err(e) = state.blobs().delete(&format!("files/{id}")).await {
        tracing::warn!(file = %id, error = %e, "file blob cleanup failed");
    }

    Ok(StatusCode::NO_CONTENT)
}
