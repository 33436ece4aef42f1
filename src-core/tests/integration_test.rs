//! Integration tests for Catalogue It
//!
//! These tests verify end-to-end functionality including:
//! - Catalogue create/edit through the editor draft
//! - Items, field values and photos
//! - Cascade deletion against an on-disk database

use catalogue_it::app::AppState;
use catalogue_it::color::Color;
use catalogue_it::database::{
    create_pool, CreateItemRequest, FieldData, FieldType, ItemFilter, Repository,
};
use catalogue_it::error::AppError;
use catalogue_it::services::{DefaultField, EditorDefaults};
use chrono::{TimeZone, Utc};
use tempfile::TempDir;

/// Helper to create a fully initialized application state
async fn create_test_state() -> (AppState, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let state = AppState::initialize(temp_dir.path().to_path_buf())
        .await
        .unwrap();

    (state, temp_dir)
}

#[tokio::test]
async fn test_catalogue_editor_workflow() {
    let (state, _temp) = create_test_state().await;

    // Create
    let mut draft = state.catalogues.new_draft().await.unwrap();
    draft.name = "Comics".to_string();
    draft.icon_name = "book.fill".to_string();
    draft.color = Color::from_hex("#AF52DE");
    draft.append_field("Issue", FieldType::Number);
    draft.append_field("Signed", FieldType::Boolean);

    let (catalogue, definitions) = state.catalogues.save(&draft, None).await.unwrap();
    assert_eq!(catalogue.color_hex, "#AF52DE");
    assert_eq!(definitions.len(), 3);

    let (item, _) = state
        .repo
        .create_item(CreateItemRequest {
            catalogue_id: catalogue.id.clone(),
            values: vec![
                (definitions[0].id.clone(), FieldData::Text("Watchmen".to_string())),
                (definitions[1].id.clone(), FieldData::Number(1.0)),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    // Edit: rename a field, change its position and drop another
    let mut draft = state.catalogues.edit_draft(&catalogue.id).await.unwrap();
    draft.fields[0].name = "Title".to_string();
    draft.move_field(0, 3);
    draft.remove_fields(&[1]);

    let (_, definitions) = state
        .catalogues
        .save(&draft, Some(&catalogue.id))
        .await
        .unwrap();
    let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["Issue", "Title"]);

    // Existing values keep the name and type they were created with
    let detail = state.items.get_item(&item.id).await.unwrap();
    assert_eq!(detail.values.len(), 3);
    assert_eq!(detail.values[0].field_name, "Name");
    assert_eq!(detail.values[1].display_value(), "1.00");
    assert_eq!(detail.values[2].display_value(), "No");
    assert_eq!(detail.display_name(), "Watchmen");
}

#[tokio::test]
async fn test_editor_defaults_seed_new_drafts() {
    let (state, _temp) = create_test_state().await;

    state
        .settings
        .update_editor_defaults(EditorDefaults {
            icon_name: "tag.fill".to_string(),
            color_hex: "#34C759".to_string(),
            fields: vec![
                DefaultField {
                    name: "Title".to_string(),
                    field_type: FieldType::Text,
                },
                DefaultField {
                    name: "Acquired".to_string(),
                    field_type: FieldType::Date,
                },
            ],
        })
        .await
        .unwrap();

    let draft = state.catalogues.new_draft().await.unwrap();
    assert_eq!(draft.icon_name, "tag.fill");
    assert_eq!(draft.color.to_rgba8(), [52, 199, 89, 255]);
    assert_eq!(draft.fields.len(), 2);
    assert_eq!(draft.fields[1].name, "Acquired");
    assert_eq!(draft.fields[1].sort_order, 1);
}

#[tokio::test]
async fn test_catalogues_listed_by_creation() {
    let (state, _temp) = create_test_state().await;

    let mut ids = Vec::new();
    for name in ["Stamps", "Coins", "Vinyl"] {
        let mut draft = state.catalogues.new_draft().await.unwrap();
        draft.name = name.to_string();
        let (catalogue, _) = state.catalogues.save(&draft, None).await.unwrap();
        ids.push(catalogue.id);
    }

    let listed: Vec<String> = state
        .catalogues
        .list_summaries()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.catalogue.id)
        .collect();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_item_values_and_wishlist() {
    let (state, _temp) = create_test_state().await;
    let (catalogue, definitions) = state.catalogues.create_sample_catalogue().await.unwrap();

    let launch = Utc.with_ymd_and_hms(1969, 7, 16, 13, 32, 0).unwrap();
    let detail = state
        .items
        .create_item(CreateItemRequest {
            catalogue_id: catalogue.id.clone(),
            is_wishlist: true,
            values: vec![
                (definitions[0].id.clone(), FieldData::Text("Apollo 11 patch".to_string())),
                (definitions[2].id.clone(), FieldData::Date(launch)),
            ],
            ..Default::default()
        })
        .await
        .unwrap();

    let purchase = &detail.values[2];
    assert_eq!(purchase.data, Some(FieldData::Date(launch)));

    // Wrong variant for the value's stored type
    let result = state
        .items
        .set_field_value(&detail.values[1].id, Some(FieldData::Text("1969".to_string())))
        .await;
    assert!(matches!(result, Err(AppError::FieldTypeMismatch { .. })));

    state
        .items
        .set_field_value(&detail.values[1].id, Some(FieldData::Number(1969.0)))
        .await
        .unwrap();
    state
        .items
        .update_item(detail.item.id.clone(), Some(false), None)
        .await
        .unwrap();

    let owned = state
        .items
        .list_items(&catalogue.id, ItemFilter::Owned)
        .await
        .unwrap();
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].values[1].display_value(), "1969.00");

    let summaries = state.catalogues.list_summaries().await.unwrap();
    assert_eq!((summaries[0].owned_count, summaries[0].wishlist_count), (1, 0));
}

#[tokio::test]
async fn test_photos_ordering_and_primary() {
    let (state, _temp) = create_test_state().await;
    let (catalogue, _) = state.catalogues.create_sample_catalogue().await.unwrap();
    let detail = state
        .items
        .create_item(CreateItemRequest {
            catalogue_id: catalogue.id,
            ..Default::default()
        })
        .await
        .unwrap();
    let item_id = detail.item.id;

    let front = state.photos.add_photo(&item_id, b"front", None).await.unwrap();
    let back = state
        .photos
        .add_photo(&item_id, b"back", Some("Back"))
        .await
        .unwrap();

    let detail = state.items.get_item(&item_id).await.unwrap();
    assert_eq!(detail.primary_photo().unwrap().id, front.id);

    state
        .photos
        .reorder_photos(&item_id, &[back.id.clone(), front.id.clone()])
        .await
        .unwrap();
    let detail = state.items.get_item(&item_id).await.unwrap();
    assert_eq!(detail.primary_photo().unwrap().id, back.id);

    state.photos.delete_photo(&back.id).await.unwrap();
    let photos = state.photos.list_photos(&item_id).await.unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].id, front.id);
    assert_eq!(photos[0].sort_order, 0);
    assert_eq!(state.photos.photo_data(&front.id).await.unwrap(), b"front");
}

#[tokio::test]
async fn test_cascade_delete_leaves_no_orphans() {
    let (state, _temp) = create_test_state().await;
    let (catalogue, _) = state.catalogues.create_sample_catalogue().await.unwrap();
    let (other, _) = state.catalogues.create_sample_catalogue().await.unwrap();

    let mut item_ids = Vec::new();
    for is_wishlist in [false, true, false] {
        let detail = state
            .items
            .create_item(CreateItemRequest {
                catalogue_id: catalogue.id.clone(),
                is_wishlist,
                ..Default::default()
            })
            .await
            .unwrap();
        state
            .photos
            .add_photo(&detail.item.id, detail.item.id.as_bytes(), None)
            .await
            .unwrap();
        item_ids.push(detail.item.id);
    }

    // A photo in another catalogue shares a blob with the deleted one
    let survivor = state
        .items
        .create_item(CreateItemRequest {
            catalogue_id: other.id.clone(),
            ..Default::default()
        })
        .await
        .unwrap();
    let shared = state
        .photos
        .add_photo(&survivor.item.id, item_ids[0].as_bytes(), None)
        .await
        .unwrap();

    state.catalogues.delete_catalogue(&catalogue.id).await.unwrap();

    let pool = state.repo.pool();
    for table in ["field_definitions", "catalogue_items"] {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE catalogue_id = ?",
            table
        ))
        .bind(&catalogue.id)
        .fetch_one(pool)
        .await
        .unwrap();
        assert_eq!(count, 0, "orphans left in {}", table);
    }
    for item_id in &item_ids {
        assert!(state.repo.list_field_values(item_id).await.unwrap().is_empty());
        assert!(state.repo.list_photos(item_id).await.unwrap().is_empty());
    }

    let blobs = state.blob_store.list_all().await.unwrap();
    assert_eq!(blobs, vec![shared.blob_hash.clone()]);

    // The other catalogue is untouched
    let remaining = state.catalogues.list_summaries().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].catalogue.id, other.id);
    assert_eq!(remaining[0].owned_count, 1);
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");

    let repo = Repository::new(create_pool(&db_path).await.unwrap());
    let (catalogue, _) = repo
        .create_catalogue(catalogue_it::database::CreateCatalogueRequest {
            name: "Minerals".to_string(),
            icon_name: "leaf.fill".to_string(),
            color_hex: "#00C7BE".to_string(),
            fields: Vec::new(),
        })
        .await
        .unwrap();
    repo.pool().close().await;

    let reopened = Repository::new(create_pool(&db_path).await.unwrap());
    let fetched = reopened.get_catalogue(&catalogue.id).await.unwrap();
    assert_eq!(fetched.name, "Minerals");
    assert_eq!(fetched.created_at, catalogue.created_at);
}
