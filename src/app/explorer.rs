//! Folder explorer state.
//!
//! Holds what one folder screen shows (the listing, the breadcrumb trail,
//! the folder title) and runs the actions offered on it. Every action
//! reports its outcome as a [`Notice`] and also returns it as a `Result`.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::events::{EventBus, Notice};
use super::route::Route;
use crate::api::files::FileApi;
use crate::api::types::{FileEntry, FolderEntry, FolderListing, ItemSummary, UploadFile};
use crate::auth::validation::{validate_folder_name, validate_new_name};
use crate::error::{DriveError, Result};
use crate::file::format::{format_file_size, save_blob};

/// Title of the drive root.
pub const ROOT_NAME: &str = "My Drive";

/// One step of the breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    /// Folder id; `None` for the root.
    pub id: Option<String>,
    /// Display name.
    pub name: String,
}

impl Breadcrumb {
    /// The root crumb.
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_NAME.to_string(),
        }
    }

    /// Where clicking this crumb goes.
    pub fn route(&self) -> Route {
        match &self.id {
            Some(id) => Route::Folder(id.clone()),
            None => Route::Dashboard,
        }
    }
}

/// Title for a folder whose listing carried no folder details.
pub fn placeholder_folder_name(folder_id: &str) -> String {
    let prefix: String = folder_id.chars().take(6).collect();
    format!("Folder {}", prefix)
}

/// Result of [`FolderExplorer::rename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The new name equals the current one; nothing was sent.
    Unchanged,
    /// The server accepted the rename. Holds the item when it was echoed back.
    Renamed(Option<ItemSummary>),
}

/// State and actions of one folder screen.
#[derive(Debug)]
pub struct FolderExplorer {
    api: FileApi,
    events: EventBus,
    max_upload_bytes: u64,
    download_dir: PathBuf,
    folder_id: Option<String>,
    folder_name: String,
    files: Vec<FileEntry>,
    folders: Vec<FolderEntry>,
    loading: bool,
}

impl FolderExplorer {
    /// Create an explorer at the drive root. Nothing is loaded yet.
    pub fn new(api: FileApi, events: EventBus, max_upload_bytes: u64) -> Self {
        Self {
            api,
            events,
            max_upload_bytes,
            download_dir: PathBuf::from("downloads"),
            folder_id: None,
            folder_name: ROOT_NAME.to_string(),
            files: Vec::new(),
            folders: Vec::new(),
            loading: false,
        }
    }

    /// Save downloads under `dir` when no directory is given.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Directory [`FolderExplorer::download_default`] saves into.
    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Current folder id; `None` at the root.
    pub fn folder_id(&self) -> Option<&str> {
        self.folder_id.as_deref()
    }

    /// Current folder title.
    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Files in the current folder.
    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    /// Sub-folders of the current folder.
    pub fn folders(&self) -> &[FolderEntry] {
        &self.folders
    }

    /// Whether a load is in progress.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the folder is empty (and not loading).
    pub fn is_empty(&self) -> bool {
        !self.loading && self.files.is_empty() && self.folders.is_empty()
    }

    /// Breadcrumb trail: the root, then the current folder if not at the root.
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        let mut crumbs = vec![Breadcrumb::root()];
        if let Some(id) = &self.folder_id {
            crumbs.push(Breadcrumb {
                id: Some(id.clone()),
                name: self.folder_name.clone(),
            });
        }
        crumbs
    }

    /// Move to a folder (`None` for the root) and load it.
    pub async fn open(&mut self, folder_id: Option<&str>) -> Result<()> {
        self.folder_id = folder_id.map(str::to_string);
        self.folder_name = match folder_id {
            Some(_) => "Loading...".to_string(),
            None => ROOT_NAME.to_string(),
        };
        self.files.clear();
        self.folders.clear();
        self.refresh().await
    }

    /// Reload the current folder.
    pub async fn refresh(&mut self) -> Result<()> {
        self.loading = true;
        let result = self.api.get_folder(self.folder_id.as_deref()).await;
        self.loading = false;

        match result {
            Ok(listing) => {
                self.apply_listing(listing);
                Ok(())
            }
            Err(e) => {
                warn!(folder = ?self.folder_id, "failed to load folder: {}", e);
                self.events.notify(Notice::destructive(
                    "Error",
                    "Failed to load files and folders",
                ));
                Err(e)
            }
        }
    }

    fn apply_listing(&mut self, listing: FolderListing) {
        if let Some(id) = &self.folder_id {
            self.folder_name = match listing.folder {
                Some(folder) => folder.name,
                None => placeholder_folder_name(id),
            };
        }
        debug!(
            files = listing.files.len(),
            folders = listing.folders.len(),
            "folder loaded"
        );
        self.files = listing.files;
        self.folders = listing.folders;
    }

    /// Create a folder inside the current one, then reload.
    ///
    /// Any 2xx counts as created; the folder is returned when the server
    /// echoes it back.
    pub async fn create_folder(&mut self, name: &str) -> Result<Option<FolderEntry>> {
        validate_folder_name(name)?;

        match self.api.create_folder(name, self.folder_id.as_deref()).await {
            Ok(folder) => {
                self.events.notify(Notice::info(
                    "Success",
                    format!("Folder \"{}\" created successfully", name),
                ));
                self.refresh_quietly().await;
                Ok(folder)
            }
            Err(e) => {
                self.notify_failure("Failed to create folder", &e);
                Err(e)
            }
        }
    }

    /// Rename an item, then reload.
    ///
    /// Nothing is sent when the name is unchanged.
    pub async fn rename(
        &mut self,
        id: &str,
        current_name: &str,
        new_name: &str,
    ) -> Result<RenameOutcome> {
        validate_new_name(new_name)?;
        if new_name == current_name {
            return Ok(RenameOutcome::Unchanged);
        }

        match self.api.rename(id, new_name).await {
            Ok(item) => {
                self.events
                    .notify(Notice::info("Success", "Item renamed successfully"));
                self.refresh_quietly().await;
                Ok(RenameOutcome::Renamed(item))
            }
            Err(e) => {
                self.notify_failure("Failed to rename item", &e);
                Err(e)
            }
        }
    }

    /// Upload a file, then reload.
    pub async fn upload(&mut self, file: UploadFile) -> Result<Option<FileEntry>> {
        if file.size() > self.max_upload_bytes {
            return Err(DriveError::Validation(format!(
                "{} is too large ({}, max {})",
                file.file_name,
                format_file_size(file.size()),
                format_file_size(self.max_upload_bytes)
            )));
        }

        let file_name = file.file_name.clone();
        match self.api.upload_file(file).await {
            Ok(entry) => {
                self.events.notify(Notice::info(
                    "Upload successful",
                    format!("{} has been uploaded", file_name),
                ));
                self.refresh_quietly().await;
                Ok(entry)
            }
            Err(e) => {
                self.events.notify(Notice::destructive(
                    "Upload failed",
                    "Failed to upload file. Please try again.",
                ));
                Err(e)
            }
        }
    }

    /// Download a file into `dir` under its display name.
    pub async fn download(&self, id: &str, name: &str, dir: &Path) -> Result<PathBuf> {
        let saved = match self.api.download_file(id).await {
            Ok(bytes) => save_blob(dir, name, &bytes).await,
            Err(e) => Err(e),
        };

        match saved {
            Ok(path) => {
                self.events.notify(Notice::info(
                    "Download started",
                    format!("{} is being downloaded", name),
                ));
                Ok(path)
            }
            Err(e) => {
                self.events.notify(Notice::destructive(
                    "Download failed",
                    "Could not download this file",
                ));
                Err(e)
            }
        }
    }

    /// Download a file into the configured download directory.
    pub async fn download_default(&self, id: &str, name: &str) -> Result<PathBuf> {
        self.download(id, name, &self.download_dir).await
    }

    /// Look up the preview URL of a file.
    pub async fn preview(&self, id: &str) -> Result<String> {
        self.api.get_preview_url(id).await.map_err(|e| {
            self.events.notify(Notice::destructive(
                "Preview failed",
                "Could not generate preview for this file",
            ));
            e
        })
    }

    /// Reload after a successful mutation; a failure is already reported by
    /// `refresh` and does not undo the mutation's success.
    async fn refresh_quietly(&mut self) {
        let _ = self.refresh().await;
    }

    fn notify_failure(&self, fallback: &str, error: &DriveError) {
        let description = error.server_message().unwrap_or(fallback).to_string();
        self.events.notify(Notice::destructive("Error", description));
    }
}
