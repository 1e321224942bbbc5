//! Uploaded documents.
//!
//! Handles upload validation, filename sanitizing, on-disk storage of the
//! bytes and the metadata records in the `files` collection.

pub mod mime;
pub mod sanitize;
pub mod schema;
pub mod storage;

pub use schema::{FileRecord, IncomingFile, UploadRequest, UploadStatus};
pub use storage::FileStorage;

use crate::error::{Error, Result};
use crate::store::Stores;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// Validate an upload, write its bytes and record its metadata.
pub async fn upload(
    stores: &Stores,
    storage: &FileStorage,
    allowed_extensions: &[String],
    request: UploadRequest,
) -> Result<FileRecord> {
    let file = request
        .file
        .ok_or_else(|| Error::validation("No file provided"))?;
    let project_id = request
        .project_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::validation("Project ID is required"))?;
    if file.file_name.is_empty() {
        return Err(Error::validation("No file selected"));
    }
    if !sanitize::is_allowed(&file.file_name, allowed_extensions) {
        return Err(Error::validation("File type not allowed"));
    }
    let ext = sanitize::extension_of(&file.file_name).unwrap_or_default();

    let id = Uuid::new_v4().to_string();
    let filename = sanitize::stored_filename(&file.file_name, &ext);
    let path = storage.store(&id, &filename, &file.data).await?;
    let mime_type = mime::resolve_mime_type(file.content_type.as_deref(), &filename, &ext);

    let record = FileRecord {
        id,
        filename,
        original_name: file.file_name,
        size: file.data.len() as u64,
        mime_type,
        project_id,
        upload_date: Utc::now(),
        status: UploadStatus::Completed,
        path: path.to_string_lossy().into_owned(),
    };
    if let Err(e) = stores.files.put(record.clone()) {
        // Don't leave an orphaned blob behind when the metadata can't be saved.
        let _ = storage.delete(&path).await;
        return Err(e);
    }

    tracing::info!(
        file_id = %record.id,
        project_id = %record.project_id,
        size = record.size,
        "Uploaded file: {}",
        record.filename
    );
    Ok(record)
}

/// All file records, optionally only those of one project.
pub fn list(stores: &Stores, project_id: Option<&str>) -> Result<Vec<FileRecord>> {
    match project_id {
        Some(project_id) => stores.files.list_where(&|f: &FileRecord| f.project_id == project_id),
        None => stores.files.list(),
    }
}

/// Remove the stored bytes (best effort) and the metadata record.
pub async fn delete(stores: &Stores, storage: &FileStorage, file_id: &str) -> Result<FileRecord> {
    let record = stores
        .files
        .get(file_id)?
        .ok_or_else(|| Error::not_found("File not found"))?;

    if !record.path.is_empty() {
        if let Err(e) = storage.delete(Path::new(&record.path)).await {
            tracing::warn!(file_id, path = %record.path, "Could not remove stored file: {e}");
        }
    }

    let removed = stores
        .files
        .delete(file_id)?
        .ok_or_else(|| Error::not_found("File not found"))?;
    tracing::info!(file_id, "Deleted file: {}", removed.filename);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ALLOWED_EXTENSIONS;

    fn allowed() -> Vec<String> {
        DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|e| (*e).to_string())
            .collect()
    }

    fn request(name: &str, project_id: Option<&str>) -> UploadRequest {
        UploadRequest {
            file: Some(IncomingFile {
                file_name: name.to_string(),
                content_type: None,
                data: b"dark matter notes".to_vec(),
            }),
            project_id: project_id.map(str::to_string),
        }
    }

    async fn reject(req: UploadRequest) -> String {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::in_memory();
        let storage = FileStorage::new(dir.path());
        match upload(&stores, &storage, &allowed(), req).await {
            Err(Error::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upload_validation_messages() {
        assert_eq!(
            reject(UploadRequest {
                file: None,
                project_id: Some("p".into())
            })
            .await,
            "No file provided"
        );
        assert_eq!(reject(request("a.txt", None)).await, "Project ID is required");
        assert_eq!(reject(request("a.txt", Some("  "))).await, "Project ID is required");
        assert_eq!(reject(request("", Some("p"))).await, "No file selected");
        assert_eq!(reject(request("setup.exe", Some("p"))).await, "File type not allowed");
    }

    #[tokio::test]
    async fn upload_stores_bytes_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::in_memory();
        let storage = FileStorage::new(dir.path());

        let record = upload(&stores, &storage, &allowed(), request("My Notes.TXT", Some("p1")))
            .await
            .unwrap();

        assert_eq!(record.filename, "My_Notes.TXT");
        assert_eq!(record.original_name, "My Notes.TXT");
        assert_eq!(record.project_id, "p1");
        assert_eq!(record.size, 17);
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.status, UploadStatus::Completed);

        let on_disk = dir.path().join(format!("{}_My_Notes.TXT", record.id));
        assert_eq!(Path::new(&record.path), on_disk);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"dark matter notes");

        assert_eq!(list(&stores, None).unwrap(), vec![record.clone()]);
        assert_eq!(list(&stores, Some("p1")).unwrap().len(), 1);
        assert!(list(&stores, Some("other")).unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_bytes_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::in_memory();
        let storage = FileStorage::new(dir.path());
        let record = upload(&stores, &storage, &allowed(), request("a.csv", Some("p")))
            .await
            .unwrap();

        delete(&stores, &storage, &record.id).await.unwrap();
        assert!(!Path::new(&record.path).exists());
        assert!(list(&stores, None).unwrap().is_empty());

        assert!(matches!(
            delete(&stores, &storage, &record.id).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_tolerates_missing_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let stores = Stores::in_memory();
        let storage = FileStorage::new(dir.path());
        let record = upload(&stores, &storage, &allowed(), request("a.md", Some("p")))
            .await
            .unwrap();
        std::fs::remove_file(&record.path).unwrap();

        let removed = delete(&stores, &storage, &record.id).await.unwrap();
        assert_eq!(removed.id, record.id);
    }
}
