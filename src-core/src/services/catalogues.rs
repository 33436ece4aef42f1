//! Catalogues service
//!
//! Create/edit workflow for catalogues driven by a [`CatalogueDraft`],
//! listing with owned/wishlist counts, and cascading deletion.

use crate::database::{
    Catalogue, CreateCatalogueRequest, FieldDefinition, FieldType, NewFieldDefinition,
    ReplaceCatalogueRequest, Repository,
};
use crate::error::{AppError, Result};
use crate::services::draft::CatalogueDraft;
use crate::services::photos::release_blobs;
use crate::services::settings::SettingsService;
use crate::storage::BlobStore;
use serde::Serialize;

/// A catalogue with its item counts, as shown in the catalogue list
#[derive(Debug, Clone, Serialize)]
pub struct CatalogueSummary {
    pub catalogue: Catalogue,
    pub owned_count: i64,
    pub wishlist_count: i64,
}

/// Service for managing catalogues
#[derive(Clone)]
pub struct CatalogueService {
    repo: Repository,
    blob_store: BlobStore,
    settings: SettingsService,
}

impl CatalogueService {
    pub fn new(repo: Repository, blob_store: BlobStore, settings: SettingsService) -> Self {
        Self {
            repo,
            blob_store,
            settings,
        }
    }

    /// Draft for a new catalogue using the configured editor defaults
    pub async fn new_draft(&self) -> Result<CatalogueDraft> {
        let defaults = self.settings.get_editor_defaults().await?;
        Ok(CatalogueDraft::new(&defaults))
    }

    /// Draft pre-filled from an existing catalogue
    pub async fn edit_draft(&self, id: &str) -> Result<CatalogueDraft> {
        let (catalogue, definitions) = self.get_catalogue(id).await?;
        Ok(CatalogueDraft::from_existing(&catalogue, &definitions))
    }

    /// Save a draft, creating a new catalogue or updating `existing_id`.
    ///
    /// On update every field definition is deleted and recreated from the
    /// draft; items and their values are left as they are.
    pub async fn save(
        &self,
        draft: &CatalogueDraft,
        existing_id: Option<&str>,
    ) -> Result<(Catalogue, Vec<FieldDefinition>)> {
        if !draft.can_save() {
            return Err(AppError::InvalidDraft(
                "a name and at least one field are required".to_string(),
            ));
        }

        let name = draft.name.trim().to_string();
        let color_hex = draft.color.to_hex();
        let fields = draft.field_definitions();

        match existing_id {
            Some(id) => {
                tracing::info!("Updating catalogue: {}", id);

                let saved = self
                    .repo
                    .replace_catalogue(ReplaceCatalogueRequest {
                        id: id.to_string(),
                        name,
                        icon_name: draft.icon_name.clone(),
                        color_hex,
                        fields,
                    })
                    .await?;

                tracing::info!("Catalogue updated: {}", id);
                Ok(saved)
            }
            None => {
                tracing::info!("Creating catalogue: {}", name);

                let saved = self
                    .repo
                    .create_catalogue(CreateCatalogueRequest {
                        name,
                        icon_name: draft.icon_name.clone(),
                        color_hex,
                        fields,
                    })
                    .await?;

                tracing::info!("Catalogue created: {}", saved.0.id);
                Ok(saved)
            }
        }
    }

    /// Get a catalogue and its field definitions in display order
    pub async fn get_catalogue(&self, id: &str) -> Result<(Catalogue, Vec<FieldDefinition>)> {
        let catalogue = self.repo.get_catalogue(id).await?;
        let definitions = self.repo.list_field_definitions(id).await?;
        Ok((catalogue, definitions))
    }

    /// All catalogues, oldest first, with owned and wishlist counts
    pub async fn list_summaries(&self) -> Result<Vec<CatalogueSummary>> {
        let catalogues = self.repo.list_catalogues().await?;

        let mut summaries = Vec::with_capacity(catalogues.len());
        for catalogue in catalogues {
            let (owned_count, wishlist_count) = self.repo.count_items(&catalogue.id).await?;
            summaries.push(CatalogueSummary {
                catalogue,
                owned_count,
                wishlist_count,
            });
        }

        Ok(summaries)
    }

    /// Delete a catalogue and everything it owns
    pub async fn delete_catalogue(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting catalogue: {}", id);

        let hashes = self.repo.delete_catalogue(id).await?;
        release_blobs(&self.repo, &self.blob_store, &hashes).await?;

        tracing::info!("Catalogue deleted: {}", id);

        Ok(())
    }

    /// Create a ready-made example catalogue
    pub async fn create_sample_catalogue(&self) -> Result<(Catalogue, Vec<FieldDefinition>)> {
        let fields = [
            ("Name", FieldType::Text),
            ("Year", FieldType::Number),
            ("Purchase Date", FieldType::Date),
            ("Mint Condition", FieldType::Boolean),
        ]
        .iter()
        .enumerate()
        .map(|(index, (name, field_type))| NewFieldDefinition {
            name: name.to_string(),
            field_type: *field_type,
            sort_order: index as i64,
        })
        .collect();

        let saved = self
            .repo
            .create_catalogue(CreateCatalogueRequest {
                name: "My Collection".to_string(),
                icon_name: "star.fill".to_string(),
                color_hex: "#FF9500".to_string(),
                fields,
            })
            .await?;

        tracing::info!("Sample catalogue created: {}", saved.0.id);

        Ok(saved)
    }
}
