//! Items service
//!
//! Item lifecycle within a catalogue: creation from the catalogue's current
//! field definitions, value edits, wishlist/notes updates, search and
//! cascading deletion.

use crate::database::{
    CatalogueItem, CreateItemRequest, FieldData, FieldValue, ItemFilter, ItemPhoto, Repository,
    UpdateItemRequest,
};
use crate::display;
use crate::error::Result;
use crate::services::photos::release_blobs;
use crate::storage::BlobStore;
use serde::Serialize;

/// An item with its field values and photos, both in display order
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub item: CatalogueItem,
    pub values: Vec<FieldValue>,
    pub photos: Vec<ItemPhoto>,
}

impl ItemDetail {
    pub fn display_name(&self) -> String {
        display::display_name(&self.values)
    }

    pub fn primary_photo(&self) -> Option<&ItemPhoto> {
        display::primary_photo(&self.photos)
    }
}

/// Service for managing catalogue items
#[derive(Clone)]
pub struct ItemsService {
    repo: Repository,
    blob_store: BlobStore,
}

impl ItemsService {
    pub fn new(repo: Repository, blob_store: BlobStore) -> Self {
        Self { repo, blob_store }
    }

    /// Create an item, one value per field definition of its catalogue
    pub async fn create_item(&self, mut req: CreateItemRequest) -> Result<ItemDetail> {
        tracing::info!(
            "Creating {} item in catalogue: {}",
            if req.is_wishlist { "wishlist" } else { "owned" },
            req.catalogue_id
        );

        req.notes = req
            .notes
            .take()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let (item, values) = self.repo.create_item(req).await?;

        tracing::info!("Item created: {}", item.id);

        Ok(ItemDetail {
            item,
            values,
            photos: Vec::new(),
        })
    }

    /// Get an item with its values and photos
    pub async fn get_item(&self, id: &str) -> Result<ItemDetail> {
        let item = self.repo.get_item(id).await?;
        self.load_detail(item).await
    }

    /// Items of a catalogue, oldest first
    pub async fn list_items(&self, catalogue_id: &str, filter: ItemFilter) -> Result<Vec<ItemDetail>> {
        self.repo.get_catalogue(catalogue_id).await?;

        let items = self.repo.list_items(catalogue_id, filter).await?;

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(self.load_detail(item).await?);
        }

        Ok(details)
    }

    /// Change the wishlist flag and/or notes of an item
    pub async fn update_item(
        &self,
        id: String,
        is_wishlist: Option<bool>,
        notes: Option<Option<String>>,
    ) -> Result<CatalogueItem> {
        tracing::debug!("Updating item: {}", id);

        let notes = notes.map(|n| n.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()));

        let item = self
            .repo
            .update_item(UpdateItemRequest {
                id,
                is_wishlist,
                notes,
            })
            .await?;

        tracing::debug!("Item updated successfully: {}", item.id);

        Ok(item)
    }

    /// Set or clear one field value of an item
    pub async fn set_field_value(&self, value_id: &str, data: Option<FieldData>) -> Result<FieldValue> {
        self.repo.set_field_value(value_id, data).await
    }

    /// Case-insensitive search over text values and notes
    pub async fn search_items(
        &self,
        catalogue_id: &str,
        query: &str,
        filter: ItemFilter,
    ) -> Result<Vec<ItemDetail>> {
        let query_lower = query.trim().to_lowercase();
        let all_items = self.list_items(catalogue_id, ItemFilter::All).await?;

        let matches: Vec<ItemDetail> = all_items
            .into_iter()
            .filter(|detail| filter.matches(&detail.item))
            .filter(|detail| {
                if query_lower.is_empty() {
                    return true;
                }

                let in_values = detail.values.iter().any(|value| match &value.data {
                    Some(FieldData::Text(text)) => text.to_lowercase().contains(&query_lower),
                    _ => false,
                });
                let in_notes = detail
                    .item
                    .notes
                    .as_ref()
                    .is_some_and(|notes| notes.to_lowercase().contains(&query_lower));

                in_values || in_notes
            })
            .collect();

        Ok(matches)
    }

    /// Delete an item with its values and photos
    pub async fn delete_item(&self, id: &str) -> Result<()> {
        tracing::info!("Deleting item: {}", id);

        let hashes = self.repo.delete_item(id).await?;
        release_blobs(&self.repo, &self.blob_store, &hashes).await?;

        tracing::info!("Item deleted successfully: {}", id);

        Ok(())
    }

    async fn load_detail(&self, item: CatalogueItem) -> Result<ItemDetail> {
        let values = self.repo.list_field_values(&item.id).await?;
        let photos = self.repo.list_photos(&item.id).await?;

        Ok(ItemDetail {
            item,
            values,
            photos,
        })
    }
}
