//! Client for the drive REST API.
//!
//! [`ApiGateway`] is the single request pipeline (token attachment and
//! unauthorized handling); [`FileApi`] layers the typed file and folder
//! operations on top of it.

pub mod endpoints;
pub mod files;
pub mod gateway;
pub mod types;

pub use files::FileApi;
pub use gateway::{ApiGateway, ApiRequest, RequestBody};
pub use types::{
    FileEntry, FolderEntry, FolderListing, ItemSummary, NewFolder, PreviewResponse,
    RenameRequest, TokenResponse, UploadFile,
};
