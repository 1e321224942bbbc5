use super::error::{ApiError, ApiResultExt};
use super::AppState;
use crate::files::{self, IncomingFile, UploadRequest};
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileListQuery {
    project_id: Option<String>,
}

pub(super) async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart?;
    let limit = state.max_upload_bytes;
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from_multipart(e, limit))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                request.file = Some(IncomingFile {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            Some("project_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::from_multipart(e, limit))?;
                request.project_id = Some(value);
            }
            _ => {}
        }
    }

    let record = files::upload(
        &state.stores,
        &state.storage,
        &state.allowed_extensions,
        request,
    )
    .await
    .api_context("Failed to upload file")?;
    Ok(Json(json!({ "file": record })))
}

pub(super) async fn list_files(
    State(state): State<AppState>,
    query: Result<Query<FileListQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let files = files::list(&state.stores, query.project_id.as_deref())
        .api_context("Failed to list files")?;
    Ok(Json(json!({ "files": files })))
}

pub(super) async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    files::delete(&state.stores, &state.storage, &file_id)
        .await
        .api_context("Failed to delete file")?;
    Ok(Json(json!({ "message": "File deleted successfully" })))
}
