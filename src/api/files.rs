//! Typed file and folder operations.
//!
//! Each call builds a path, goes through the gateway and decodes the result.
//! Mutations report the echoed item only when the success body carries one.
//! There is no caching, retrying or validation here; errors reach the caller
//! unchanged.

use std::sync::Arc;

use super::endpoints;
use super::gateway::{ApiGateway, ApiRequest};
use super::types::{
    FileEntry, FolderEntry, FolderListing, ItemSummary, NewFolder, PreviewResponse,
    RenameRequest, UploadFile,
};
use crate::error::Result;

/// File and folder operations of the drive API.
#[derive(Debug, Clone)]
pub struct FileApi {
    gateway: Arc<ApiGateway>,
}

impl FileApi {
    /// Create the operations over a gateway.
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    /// Everything at the drive root.
    pub async fn list_all(&self) -> Result<FolderListing> {
        self.gateway
            .send_json(ApiRequest::get(endpoints::FILES_PATH))
            .await
    }

    /// Contents of a folder, or of the root when `folder_id` is `None`.
    pub async fn get_folder(&self, folder_id: Option<&str>) -> Result<FolderListing> {
        self.gateway
            .send_json(ApiRequest::get(endpoints::listing(folder_id)))
            .await
    }

    /// Create a folder under `parent_id` (root when `None`).
    ///
    /// Returns the created folder when the server echoes it back.
    pub async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<Option<FolderEntry>> {
        let body = NewFolder {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
        };
        self.gateway
            .send_optional_json(ApiRequest::post_json(endpoints::FOLDER_PATH, &body)?)
            .await
    }

    /// Upload a file as multipart field `file`.
    pub async fn upload_file(&self, file: UploadFile) -> Result<Option<FileEntry>> {
        self.gateway
            .send_optional_json(ApiRequest::upload(endpoints::UPLOAD_PATH, file))
            .await
    }

    /// Raw contents of a file.
    pub async fn download_file(&self, id: &str) -> Result<Vec<u8>> {
        self.gateway
            .send_bytes(ApiRequest::get(endpoints::download(id)))
            .await
    }

    /// URL the file can be previewed at.
    pub async fn get_preview_url(&self, id: &str) -> Result<String> {
        let response: PreviewResponse = self
            .gateway
            .send_json(ApiRequest::get(endpoints::preview(id)))
            .await?;
        Ok(response.preview_url)
    }

    /// Rename a file or folder.
    pub async fn rename(&self, id: &str, new_name: &str) -> Result<Option<ItemSummary>> {
        let body = RenameRequest {
            new_name: new_name.to_string(),
        };
        self.gateway
            .send_optional_json(ApiRequest::put_json(endpoints::rename(id), &body)?)
            .await
    }
}
