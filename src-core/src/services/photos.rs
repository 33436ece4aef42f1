//! Photos service
//!
//! Item photos: bytes go to the blob store, metadata and ordering to the
//! repository. A blob is removed once no photo row references it.

use crate::database::{ItemPhoto, Repository};
use crate::error::Result;
use crate::storage::BlobStore;

/// Delete the blobs among `hashes` that no photo references any more
pub(crate) async fn release_blobs(
    repo: &Repository,
    blob_store: &BlobStore,
    hashes: &[String],
) -> Result<usize> {
    let mut released = 0;

    for hash in hashes {
        if repo.count_blob_references(hash).await? == 0 {
            blob_store.delete(hash).await?;
            released += 1;
        }
    }

    if released > 0 {
        tracing::debug!("Released {} unreferenced photo blobs", released);
    }

    Ok(released)
}

/// Service for managing item photos
#[derive(Clone)]
pub struct PhotosService {
    repo: Repository,
    blob_store: BlobStore,
}

impl PhotosService {
    pub fn new(repo: Repository, blob_store: BlobStore) -> Self {
        Self { repo, blob_store }
    }

    /// Store photo bytes and append the photo to the item
    pub async fn add_photo(
        &self,
        item_id: &str,
        data: &[u8],
        caption: Option<&str>,
    ) -> Result<ItemPhoto> {
        tracing::info!("Adding photo to item: {} ({} bytes)", item_id, data.len());

        // Fail before writing bytes for an item that does not exist
        self.repo.get_item(item_id).await?;

        let hash = self.blob_store.write(data).await?;
        let photo = self
            .repo
            .create_photo(item_id, &hash, data.len() as i64, normalize_caption(caption))
            .await?;

        tracing::info!("Photo added: {}", photo.id);

        Ok(photo)
    }

    /// Photos of an item in display order
    pub async fn list_photos(&self, item_id: &str) -> Result<Vec<ItemPhoto>> {
        self.repo.list_photos(item_id).await
    }

    /// Raw bytes of a photo
    pub async fn photo_data(&self, photo_id: &str) -> Result<Vec<u8>> {
        let photo = self.repo.get_photo(photo_id).await?;
        self.blob_store.read(&photo.blob_hash).await
    }

    /// Set or clear a caption; blank captions are stored as none
    pub async fn set_caption(&self, photo_id: &str, caption: Option<&str>) -> Result<ItemPhoto> {
        self.repo
            .update_photo_caption(photo_id, normalize_caption(caption))
            .await
    }

    /// Put an item's photos in the given order
    pub async fn reorder_photos(&self, item_id: &str, ordered_ids: &[String]) -> Result<()> {
        self.repo.reorder_photos(item_id, ordered_ids).await
    }

    /// Delete a photo, and its blob when nothing else uses it
    pub async fn delete_photo(&self, photo_id: &str) -> Result<()> {
        tracing::info!("Deleting photo: {}", photo_id);

        let hash = self.repo.delete_photo(photo_id).await?;
        release_blobs(&self.repo, &self.blob_store, &[hash]).await?;

        tracing::info!("Photo deleted: {}", photo_id);

        Ok(())
    }

    /// Remove stored blobs that no photo references, e.g. after a crash
    /// between a row delete and its blob delete
    pub async fn collect_garbage(&self) -> Result<usize> {
        let hashes = self.blob_store.list_all().await?;
        let released = release_blobs(&self.repo, &self.blob_store, &hashes).await?;

        tracing::info!("Photo garbage collection released {} blobs", released);

        Ok(released)
    }
}

fn normalize_caption(caption: Option<&str>) -> Option<&str> {
    caption.map(str::trim).filter(|c| !c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        test_pool, CreateCatalogueRequest, CreateItemRequest, FieldType, NewFieldDefinition,
    };
    use crate::error::AppError;
    use tempfile::TempDir;

    async fn create_test_service() -> (PhotosService, String, TempDir) {
        let repo = Repository::new(test_pool().await);

        let temp_dir = TempDir::new().unwrap();
        let blob_store = BlobStore::new(temp_dir.path().join("blobs"));
        blob_store.initialize().await.unwrap();

        let (catalogue, _) = repo
            .create_catalogue(CreateCatalogueRequest {
                name: "Cameras".to_string(),
                icon_name: "photo.fill".to_string(),
                color_hex: "#000000".to_string(),
                fields: vec![NewFieldDefinition {
                    name: "Model".to_string(),
                    field_type: FieldType::Text,
                    sort_order: 0,
                }],
            })
            .await
            .unwrap();
        let (item, _) = repo
            .create_item(CreateItemRequest {
                catalogue_id: catalogue.id,
                ..Default::default()
            })
            .await
            .unwrap();

        (PhotosService::new(repo, blob_store), item.id, temp_dir)
    }

    #[tokio::test]
    async fn test_add_and_read_photo() {
        let (service, item_id, _temp) = create_test_service().await;

        let photo = service
            .add_photo(&item_id, b"jpeg bytes", Some("  Front  "))
            .await
            .unwrap();

        assert_eq!(photo.size, 10);
        assert_eq!(photo.sort_order, 0);
        assert_eq!(photo.caption.as_deref(), Some("Front"));
        assert_eq!(service.photo_data(&photo.id).await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_add_photo_to_missing_item_writes_nothing() {
        let (service, _item_id, _temp) = create_test_service().await;

        let result = service.add_photo("missing", b"bytes", None).await;

        assert!(matches!(result, Err(AppError::ItemNotFound(_))));
        assert!(service.blob_store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_caption() {
        let (service, item_id, _temp) = create_test_service().await;
        let photo = service.add_photo(&item_id, b"bytes", None).await.unwrap();

        let captioned = service.set_caption(&photo.id, Some("Back")).await.unwrap();
        assert_eq!(captioned.caption.as_deref(), Some("Back"));

        let cleared = service.set_caption(&photo.id, Some("   ")).await.unwrap();
        assert_eq!(cleared.caption, None);
    }

    #[tokio::test]
    async fn test_shared_blob_kept_until_last_photo_deleted() {
        let (service, item_id, _temp) = create_test_service().await;

        let first = service.add_photo(&item_id, b"same", None).await.unwrap();
        let second = service.add_photo(&item_id, b"same", None).await.unwrap();
        assert_eq!(first.blob_hash, second.blob_hash);

        service.delete_photo(&first.id).await.unwrap();
        assert!(service.blob_store.exists(&first.blob_hash).await.unwrap());

        let remaining = service.list_photos(&item_id).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].sort_order, 0);

        service.delete_photo(&second.id).await.unwrap();
        assert!(!service.blob_store.exists(&first.blob_hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_reorder_photos() {
        let (service, item_id, _temp) = create_test_service().await;

        let a = service.add_photo(&item_id, b"a", None).await.unwrap();
        let b = service.add_photo(&item_id, b"b", None).await.unwrap();

        service
            .reorder_photos(&item_id, &[b.id.clone(), a.id.clone()])
            .await
            .unwrap();

        let photos = service.list_photos(&item_id).await.unwrap();
        assert_eq!(photos[0].id, b.id);
        assert_eq!(photos[1].id, a.id);
    }

    #[tokio::test]
    async fn test_collect_garbage() {
        let (service, item_id, _temp) = create_test_service().await;

        let kept = service.add_photo(&item_id, b"kept", None).await.unwrap();
        let stray = service.blob_store.write(b"stray").await.unwrap();

        assert_eq!(service.collect_garbage().await.unwrap(), 1);
        assert!(!service.blob_store.exists(&stray).await.unwrap());
        assert!(service.blob_store.exists(&kept.blob_hash).await.unwrap());
    }
}
