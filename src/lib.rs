//! mydrive - My Personal Drive client
//!
//! A session-aware client for a personal cloud-storage REST API: login and
//! registration, folder browsing, upload, download, rename and preview.

pub mod api;
pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;

pub use api::{ApiGateway, ApiRequest, FileApi, FileEntry, FolderEntry, FolderListing, UploadFile};
pub use app::{
    EventBus, FolderExplorer, Navigator, Notice, NoticeKind, RenameOutcome, Route, UiEvent,
};
pub use auth::{
    AuthService, AuthState, Credentials, FileTokenStore, MemoryTokenStore, Session, SessionState,
    TokenStore, User,
};
pub use client::DriveClient;
pub use config::Config;
pub use error::{DriveError, Result};
