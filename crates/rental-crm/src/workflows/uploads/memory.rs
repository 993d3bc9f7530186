use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{FileStorage, PendingFile, StoredFile, UploadError};

/// Keeps uploads in process memory and serves `memory://` links.
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    sequence: AtomicU64,
    stored: Mutex<Vec<(StoredFile, PendingFile)>>,
    rejected_names: BTreeSet<String>,
}

impl InMemoryFileStorage {
    /// Storage that rejects any file uploaded under `file_name`.
    pub fn failing_on(file_name: &str) -> Self {
        Self {
            rejected_names: BTreeSet::from([file_name.to_string()]),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Vec<StoredFile> {
        self.stored
            .lock()
            .map(|stored| stored.iter().map(|(link, _)| link.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn upload(&self, file: &PendingFile) -> Result<StoredFile, UploadError> {
        if self.rejected_names.contains(&file.file_name) {
            return Err(UploadError::Rejected {
                file_name: file.file_name.clone(),
                reason: "storage refused the file".to_string(),
            });
        }

        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let file_id = format!("file-{id:06}");
        let stored = StoredFile {
            url: format!("memory://uploads/{file_id}/{}", file.file_name),
            file_id,
        };

        self.stored
            .lock()
            .map_err(|_| UploadError::Unavailable("upload log lock poisoned".to_string()))?
            .push((stored.clone(), file.clone()));
        Ok(stored)
    }
}
