//! File upload adapter: hands applicant documents to external storage and returns stable links.

pub mod drive;
pub mod memory;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use drive::GoogleDriveFileStorage;
pub use memory::InMemoryFileStorage;

/// A file held in memory until the wizard submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn mime(&self) -> mime::Mime {
        self.content_type
            .parse()
            .unwrap_or(mime::APPLICATION_OCTET_STREAM)
    }
}

/// What the storage backend hands back for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub url: String,
    pub file_id: String,
}

/// A stored file paired with the name it was uploaded under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub file_name: String,
    pub url: String,
    pub file_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("{file_name} is empty")]
    Empty { file_name: String },
    #[error("upload of {file_name} rejected: {reason}")]
    Rejected { file_name: String, reason: String },
    #[error("file storage unavailable: {0}")]
    Unavailable(String),
}

/// External file storage. Uploads only; nothing is replaced or deleted.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn upload(&self, file: &PendingFile) -> Result<StoredFile, UploadError>;
}

/// Upload every file concurrently. Results line up with `files` by position.
pub async fn upload_batch(
    storage: &dyn FileStorage,
    files: &[PendingFile],
) -> Vec<Result<UploadedDocument, UploadError>> {
    debug!(count = files.len(), "dispatching upload batch");
    let uploads = files.iter().map(|file| async move {
        if file.bytes.is_empty() {
            return Err(UploadError::Empty {
                file_name: file.file_name.clone(),
            });
        }
        let stored = storage.upload(file).await?;
        Ok(UploadedDocument {
            file_name: file.file_name.clone(),
            url: stored.url,
            file_id: stored.file_id,
        })
    });

    let results = join_all(uploads).await;
    for error in results.iter().filter_map(|result| result.as_ref().err()) {
        warn!(%error, "document upload failed");
    }
    results
}
