//! Wire types of the drive API.

use serde::{Deserialize, Serialize};

use crate::file::format::format_date_str;

/// Response of login and registration.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Issued bearer token.
    pub token: String,
}

/// A stored file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// File id.
    pub id: String,
    /// File name.
    pub name: String,
    /// Size in bytes, when the server reports it.
    #[serde(default)]
    pub size: Option<u64>,
    /// Creation time as the server sent it.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl FileEntry {
    /// Creation time for display; unparsable values are shown as sent.
    pub fn created_label(&self) -> Option<String> {
        self.created_at.as_deref().map(format_date_str)
    }
}

/// A folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntry {
    /// Folder id.
    pub id: String,
    /// Folder name.
    pub name: String,
    /// Parent folder id; `None` at the root.
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Creation time as the server sent it.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl FolderEntry {
    /// Creation time for display; unparsable values are shown as sent.
    pub fn created_label(&self) -> Option<String> {
        self.created_at.as_deref().map(format_date_str)
    }
}

/// Contents of the root or of one folder.
///
/// The root listing has no `folder`. Missing arrays read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FolderListing {
    /// The folder itself, for non-root listings.
    #[serde(default)]
    pub folder: Option<FolderEntry>,
    /// Files directly inside.
    #[serde(default)]
    pub files: Vec<FileEntry>,
    /// Sub-folders directly inside.
    #[serde(default)]
    pub folders: Vec<FolderEntry>,
}

impl FolderListing {
    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.folders.is_empty()
    }
}

/// Body of a folder creation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFolder {
    /// Folder name.
    pub name: String,
    /// Parent folder; serialized as `null` for the root.
    pub parent_id: Option<String>,
}

/// Body of a rename.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    /// Replacement name.
    pub new_name: String,
}

/// Preview lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    /// URL the file can be viewed at.
    pub preview_url: String,
}

/// Minimal view of a renamed file or folder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemSummary {
    /// Item id.
    pub id: String,
    /// Item name after the rename.
    pub name: String,
}

/// Error body the server sends with failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Name sent with the multipart part.
    pub file_name: String,
    /// File contents.
    pub content: Vec<u8>,
    /// MIME type; guessed from the file name when absent.
    pub mime: Option<String>,
}

impl UploadFile {
    /// Create an upload from a name and contents.
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime: None,
        }
    }

    /// Set an explicit MIME type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    /// Read an upload from disk.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                crate::DriveError::Validation(format!("not a file path: {}", path.display()))
            })?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Ok(Self::new(file_name, content))
    }

    /// Size of the contents in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// MIME type to send: the explicit one, else a guess from the name.
    pub fn content_type(&self) -> String {
        match &self.mime {
            Some(mime) => mime.clone(),
            None => mime_guess::from_path(&self.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        }
    }
}
