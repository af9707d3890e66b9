//! Wiring of the client components.

use std::path::Path;
use std::sync::Arc;

use crate::api::{ApiGateway, FileApi};
use crate::app::{EventBus, FolderExplorer, Navigator};
use crate::auth::{AuthService, AuthState, FileTokenStore, TokenStore};
use crate::config::Config;
use crate::error::Result;

/// All client components, built once at startup and shared.
#[derive(Debug, Clone)]
pub struct DriveClient {
    config: Arc<Config>,
    events: EventBus,
    auth: Arc<AuthState>,
    gateway: Arc<ApiGateway>,
    auth_service: Arc<AuthService>,
    files: FileApi,
}

impl DriveClient {
    /// Build the client from configuration, restoring any persisted session.
    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let store = Arc::new(FileTokenStore::new(
            &config.storage.path,
            config.storage.token_key.as_str(),
        ));
        Self::with_store(config, store)
    }

    /// Build the client over a custom token store.
    pub fn with_store(config: Config, store: Arc<dyn TokenStore>) -> Result<Self> {
        let events = EventBus::new();
        let auth = Arc::new(AuthState::restore(store)?);
        let gateway = Arc::new(ApiGateway::new(&config.api, auth.clone(), events.clone())?);
        let auth_service = Arc::new(AuthService::new(gateway.clone()));
        let files = FileApi::new(gateway.clone());

        Ok(Self {
            config: Arc::new(config),
            events,
            auth,
            gateway,
            auth_service,
            files,
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// UI event bus.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Session holder.
    pub fn auth(&self) -> &Arc<AuthState> {
        &self.auth
    }

    /// Request pipeline.
    pub fn gateway(&self) -> &Arc<ApiGateway> {
        &self.gateway
    }

    /// Login / registration / logout.
    pub fn auth_service(&self) -> &Arc<AuthService> {
        &self.auth_service
    }

    /// Typed file operations.
    pub fn files(&self) -> &FileApi {
        &self.files
    }

    /// Directory downloads are saved to unless the caller picks one.
    pub fn download_dir(&self) -> &Path {
        Path::new(&self.config.files.download_dir)
    }

    /// A navigator starting at the screen the current session allows.
    pub async fn navigator(&self) -> Navigator {
        Navigator::new(self.auth.is_authenticated().await)
    }

    /// A fresh explorer at the drive root.
    pub fn explorer(&self) -> FolderExplorer {
        FolderExplorer::new(
            self.files.clone(),
            self.events.clone(),
            self.config.files.max_upload_bytes(),
        )
        .with_download_dir(self.download_dir())
    }
}
