//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::{BLOBS_DIRNAME, DATABASE_FILENAME};
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{CatalogueService, ItemsService, PhotosService, SettingsService};
use crate::storage::BlobStore;
use std::path::PathBuf;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub repo: Repository,
    pub blob_store: BlobStore,
    pub catalogues: CatalogueService,
    pub items: ItemsService,
    pub photos: PhotosService,
    pub settings: SettingsService,
}

impl AppState {
    /// Open (or create) the data directory and wire up every service
    pub async fn initialize(app_data_dir: PathBuf) -> Result<Self> {
        tracing::info!("Initializing application");
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;

        let pool = create_pool(&app_data_dir.join(DATABASE_FILENAME)).await?;
        let repo = Repository::new(pool);

        let blob_store = BlobStore::new(app_data_dir.join(BLOBS_DIRNAME));
        blob_store.initialize().await?;

        let settings = SettingsService::new(app_data_dir.clone());
        settings.load().await?;

        let state = Self {
            catalogues: CatalogueService::new(repo.clone(), blob_store.clone(), settings.clone()),
            items: ItemsService::new(repo.clone(), blob_store.clone()),
            photos: PhotosService::new(repo.clone(), blob_store.clone()),
            settings,
            repo,
            blob_store,
            app_data_dir,
        };

        tracing::info!("Application initialized successfully");

        Ok(state)
    }
}
