use std::io::Cursor;

use async_trait::async_trait;
use google_drive3::{api::File, api::Scope, DriveHub};
use tracing::info;

use super::{FileStorage, PendingFile, StoredFile, UploadError};

/// Uploads applicant documents into one Drive folder through the generated google-drive3
/// client.
pub struct GoogleDriveFileStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    hub: DriveHub<C>,
    folder_id: Option<String>,
}

impl<C> GoogleDriveFileStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: DriveHub<C>, folder_id: Option<String>) -> Self {
        Self { hub, folder_id }
    }

    fn map_error<E: std::fmt::Display>(file_name: &str, err: E) -> UploadError {
        UploadError::Rejected {
            file_name: file_name.to_string(),
            reason: err.to_string(),
        }
    }
}

impl<C> std::fmt::Debug for GoogleDriveFileStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDriveFileStorage")
            .field("folder_id", &self.folder_id)
            .finish_non_exhaustive()
    }
}

/// Drive omits `webViewLink` for some shared-drive uploads.
pub(crate) fn view_link(file_id: &str, web_view_link: Option<String>) -> String {
    web_view_link.unwrap_or_else(|| format!("https://drive.google.com/file/d/{file_id}/view"))
}

#[async_trait]
impl<C> FileStorage for GoogleDriveFileStorage<C>
where
    C: google_drive3::common::Connector + Send + Sync + 'static,
{
    async fn upload(&self, file: &PendingFile) -> Result<StoredFile, UploadError> {
        let metadata = File {
            name: Some(file.file_name.clone()),
            mime_type: Some(file.content_type.clone()),
            parents: self.folder_id.as_ref().map(|parent| vec![parent.clone()]),
            ..File::default()
        };

        let cursor = Cursor::new(file.bytes.clone());
        let (_, created) = self
            .hub
            .files()
            .create(metadata)
            .param("fields", "id,webViewLink")
            .supports_all_drives(true)
            .add_scope(Scope::File)
            .upload(cursor, file.mime())
            .await
            .map_err(|err| Self::map_error(&file.file_name, err))?;

        let file_id = created.id.ok_or_else(|| UploadError::Rejected {
            file_name: file.file_name.clone(),
            reason: "drive returned no file id".to_string(),
        })?;
        info!(file_id = %file_id, name = %file.file_name, "uploaded document to drive");

        Ok(StoredFile {
            url: view_link(&file_id, created.web_view_link),
            file_id,
        })
    }
}
