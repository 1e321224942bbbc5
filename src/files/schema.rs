use crate::store::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for one uploaded document. The bytes live at `path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    /// Sanitized name; the stored file is `<id>_<filename>`.
    pub filename: String,
    /// Name exactly as the client sent it.
    pub original_name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub project_id: String,
    #[serde(deserialize_with = "crate::store::timestamp::deserialize")]
    pub upload_date: DateTime<Utc>,
    pub status: UploadStatus,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Completed,
}

impl Record for FileRecord {
    const COLLECTION: &'static str = "files";

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.upload_date
    }
}

/// A file part received from the client, before validation.
#[derive(Debug, Clone, Default)]
pub struct IncomingFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Everything `POST /api/upload` may carry.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<IncomingFile>,
    pub project_id: Option<String>,
}
