//! Repository layer for database operations
//!
//! CRUD operations for catalogues, field definitions, items, field values
//! and photos. Multi-row mutations run in a single transaction, and deletes
//! cascade explicitly from the leaves up the ownership tree.

use super::models::*;
use crate::error::{AppError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// Fixed-width RFC 3339 so that text order is chronological order
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Column values for the four value slots of a field value row
struct ValueSlots {
    text: Option<String>,
    number: Option<f64>,
    date: Option<String>,
    boolean: Option<bool>,
}

impl ValueSlots {
    /// Exactly one slot is set for `Some`, none for `None`
    fn from_data(data: Option<&FieldData>) -> Self {
        let mut slots = Self {
            text: None,
            number: None,
            date: None,
            boolean: None,
        };

        match data {
            Some(FieldData::Text(text)) => slots.text = Some(text.clone()),
            Some(FieldData::Number(number)) => slots.number = Some(*number),
            Some(FieldData::Date(date)) => slots.date = Some(timestamp(*date)),
            Some(FieldData::Boolean(boolean)) => slots.boolean = Some(*boolean),
            None => {}
        }

        slots
    }
}

/// Data must match the value's type; numbers must be finite, since SQLite
/// stores NaN as NULL
fn check_field_data(field: &str, expected: FieldType, data: &FieldData) -> Result<()> {
    let found = data.field_type();
    if found != expected {
        return Err(AppError::FieldTypeMismatch {
            field: field.to_string(),
            expected,
            found,
        });
    }

    if let FieldData::Number(number) = data {
        if !number.is_finite() {
            return Err(AppError::Validation(format!(
                "Field '{}' needs a finite number, got {}",
                field, number
            )));
        }
    }

    Ok(())
}

async fn insert_field_definitions(
    conn: &mut SqliteConnection,
    catalogue_id: &str,
    fields: &[NewFieldDefinition],
) -> Result<Vec<FieldDefinition>> {
    let mut definitions = Vec::with_capacity(fields.len());

    for field in fields {
        let definition = sqlx::query_as::<_, FieldDefinition>(
            r#"
            INSERT INTO field_definitions (id, catalogue_id, name, field_type, sort_order)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(catalogue_id)
        .bind(&field.name)
        .bind(field.field_type)
        .bind(field.sort_order)
        .fetch_one(&mut *conn)
        .await?;

        definitions.push(definition);
    }

    definitions.sort_by_key(|d| d.sort_order);
    Ok(definitions)
}

/// Reassign photo sort order to positional index over the whole list
async fn renumber_photos(conn: &mut SqliteConnection, item_id: &str) -> Result<()> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT id FROM item_photos WHERE item_id = ? ORDER BY sort_order ASC, id ASC",
    )
    .bind(item_id)
    .fetch_all(&mut *conn)
    .await?;

    for (index, id) in ids.iter().enumerate() {
        sqlx::query("UPDATE item_photos SET sort_order = ? WHERE id = ?")
            .bind(index as i64)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ===== Catalogues =====

    /// Create a catalogue together with its field definitions
    pub async fn create_catalogue(
        &self,
        req: CreateCatalogueRequest,
    ) -> Result<(Catalogue, Vec<FieldDefinition>)> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let catalogue = sqlx::query_as::<_, Catalogue>(
            r#"
            INSERT INTO catalogues (id, name, icon_name, color_hex, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(&req.icon_name)
        .bind(&req.color_hex)
        .bind(timestamp(now))
        .fetch_one(&mut *tx)
        .await?;

        let definitions = insert_field_definitions(&mut tx, &id, &req.fields).await?;

        tx.commit().await?;

        tracing::debug!(
            "Created catalogue: {} with {} field definitions",
            id,
            definitions.len()
        );
        Ok((catalogue, definitions))
    }

    /// Overwrite a catalogue's details and recreate all of its field definitions.
    ///
    /// Existing items and their field values are left untouched.
    pub async fn replace_catalogue(
        &self,
        req: ReplaceCatalogueRequest,
    ) -> Result<(Catalogue, Vec<FieldDefinition>)> {
        let mut tx = self.pool.begin().await?;

        let catalogue = sqlx::query_as::<_, Catalogue>(
            r#"
            UPDATE catalogues SET name = ?, icon_name = ?, color_hex = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&req.name)
        .bind(&req.icon_name)
        .bind(&req.color_hex)
        .bind(&req.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::CatalogueNotFound(req.id.clone()))?;

        let removed = sqlx::query("DELETE FROM field_definitions WHERE catalogue_id = ?")
            .bind(&req.id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let definitions = insert_field_definitions(&mut tx, &req.id, &req.fields).await?;

        tx.commit().await?;

        tracing::debug!(
            "Replaced catalogue: {} ({} field definitions removed, {} created)",
            req.id,
            removed,
            definitions.len()
        );
        Ok((catalogue, definitions))
    }

    /// Get a catalogue by ID
    pub async fn get_catalogue(&self, id: &str) -> Result<Catalogue> {
        sqlx::query_as::<_, Catalogue>("SELECT * FROM catalogues WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::CatalogueNotFound(id.to_string()))
    }

    /// List all catalogues, oldest first
    pub async fn list_catalogues(&self) -> Result<Vec<Catalogue>> {
        let catalogues = sqlx::query_as::<_, Catalogue>(
            r#"
            SELECT * FROM catalogues ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(catalogues)
    }

    /// Field definitions of a catalogue in display order
    pub async fn list_field_definitions(&self, catalogue_id: &str) -> Result<Vec<FieldDefinition>> {
        let definitions = sqlx::query_as::<_, FieldDefinition>(
            r#"
            SELECT * FROM field_definitions
            WHERE catalogue_id = ?
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(catalogue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(definitions)
    }

    /// Count (owned, wishlist) items of a catalogue
    pub async fn count_items(&self, catalogue_id: &str) -> Result<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN is_wishlist = 0 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN is_wishlist = 1 THEN 1 ELSE 0 END), 0)
            FROM catalogue_items WHERE catalogue_id = ?
            "#,
        )
        .bind(catalogue_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Delete a catalogue with its field definitions, items, values and photos.
    ///
    /// Returns the blob hashes of the removed photos.
    pub async fn delete_catalogue(&self, id: &str) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<String> = sqlx::query_scalar("SELECT id FROM catalogues WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            return Err(AppError::CatalogueNotFound(id.to_string()));
        }

        let blob_hashes: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.blob_hash FROM item_photos p
            JOIN catalogue_items i ON p.item_id = i.id
            WHERE i.catalogue_id = ?
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let photos = sqlx::query(
            "DELETE FROM item_photos WHERE item_id IN (SELECT id FROM catalogue_items WHERE catalogue_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let values = sqlx::query(
            "DELETE FROM field_values WHERE item_id IN (SELECT id FROM catalogue_items WHERE catalogue_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let items = sqlx::query("DELETE FROM catalogue_items WHERE catalogue_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let definitions = sqlx::query("DELETE FROM field_definitions WHERE catalogue_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM catalogues WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            "Deleted catalogue: {} ({} definitions, {} items, {} values, {} photos)",
            id,
            definitions,
            items,
            values,
            photos
        );
        Ok(blob_hashes)
    }

    // ===== Items =====

    /// Create an item with one field value per current field definition
    pub async fn create_item(
        &self,
        req: CreateItemRequest,
    ) -> Result<(CatalogueItem, Vec<FieldValue>)> {
        self.get_catalogue(&req.catalogue_id).await?;
        let definitions = self.list_field_definitions(&req.catalogue_id).await?;

        // Validate everything before the first write
        let mut provided: HashMap<String, FieldData> = HashMap::new();
        for (definition_id, data) in req.values {
            let definition = definitions
                .iter()
                .find(|d| d.id == definition_id)
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Field definition {} does not belong to catalogue {}",
                        definition_id, req.catalogue_id
                    ))
                })?;
            check_field_data(&definition.name, definition.field_type, &data)?;
            provided.insert(definition_id, data);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, CatalogueItem>(
            r#"
            INSERT INTO catalogue_items (id, catalogue_id, is_wishlist, notes, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(&req.catalogue_id)
        .bind(req.is_wishlist)
        .bind(&req.notes)
        .bind(timestamp(now))
        .fetch_one(&mut *tx)
        .await?;

        let mut values = Vec::with_capacity(definitions.len());
        for definition in &definitions {
            let slots = ValueSlots::from_data(provided.get(&definition.id));

            let value = sqlx::query_as::<_, FieldValue>(
                r#"
                INSERT INTO field_values
                    (id, item_id, field_name, field_type, sort_order,
                     text_value, number_value, date_value, bool_value)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&id)
            .bind(&definition.name)
            .bind(definition.field_type)
            .bind(definition.sort_order)
            .bind(slots.text)
            .bind(slots.number)
            .bind(slots.date)
            .bind(slots.boolean)
            .fetch_one(&mut *tx)
            .await?;

            values.push(value);
        }

        tx.commit().await?;

        tracing::debug!(
            "Created item: {} in catalogue: {} with {} values",
            id,
            req.catalogue_id,
            values.len()
        );
        Ok((item, values))
    }

    /// Get an item by ID
    pub async fn get_item(&self, id: &str) -> Result<CatalogueItem> {
        sqlx::query_as::<_, CatalogueItem>("SELECT * FROM catalogue_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(id.to_string()))
    }

    /// List the items of a catalogue, oldest first
    pub async fn list_items(
        &self,
        catalogue_id: &str,
        filter: ItemFilter,
    ) -> Result<Vec<CatalogueItem>> {
        let mut query = "SELECT * FROM catalogue_items WHERE catalogue_id = ?".to_string();

        match filter {
            ItemFilter::All => {}
            ItemFilter::Owned => query.push_str(" AND is_wishlist = 0"),
            ItemFilter::Wishlist => query.push_str(" AND is_wishlist = 1"),
        }

        query.push_str(" ORDER BY created_at ASC, rowid ASC");

        let items = sqlx::query_as::<_, CatalogueItem>(&query)
            .bind(catalogue_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    /// Update an item's wishlist flag and notes
    pub async fn update_item(&self, req: UpdateItemRequest) -> Result<CatalogueItem> {
        let current = self.get_item(&req.id).await?;

        let is_wishlist = req.is_wishlist.unwrap_or(current.is_wishlist);
        let notes = req.notes.unwrap_or(current.notes);

        let item = sqlx::query_as::<_, CatalogueItem>(
            r#"
            UPDATE catalogue_items SET is_wishlist = ?, notes = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(is_wishlist)
        .bind(&notes)
        .bind(&req.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::ItemNotFound(req.id.clone()))?;

        tracing::debug!("Updated item: {}", item.id);
        Ok(item)
    }

    /// Delete an item with its field values and photos.
    ///
    /// Returns the blob hashes of the removed photos.
    pub async fn delete_item(&self, id: &str) -> Result<Vec<String>> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM catalogue_items WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            return Err(AppError::ItemNotFound(id.to_string()));
        }

        let blob_hashes: Vec<String> =
            sqlx::query_scalar("SELECT DISTINCT blob_hash FROM item_photos WHERE item_id = ?")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM item_photos WHERE item_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM field_values WHERE item_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM catalogue_items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Deleted item: {}", id);
        Ok(blob_hashes)
    }

    // ===== Field values =====

    /// Field values of an item in display order
    pub async fn list_field_values(&self, item_id: &str) -> Result<Vec<FieldValue>> {
        let values = sqlx::query_as::<_, FieldValue>(
            r#"
            SELECT * FROM field_values
            WHERE item_id = ?
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(values)
    }

    /// Get a field value by ID
    pub async fn get_field_value(&self, id: &str) -> Result<FieldValue> {
        sqlx::query_as::<_, FieldValue>("SELECT * FROM field_values WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::FieldValueNotFound(id.to_string()))
    }

    /// Set or clear a field value.
    ///
    /// The data must match the value's stored field type. All other slots
    /// are cleared.
    pub async fn set_field_value(&self, id: &str, data: Option<FieldData>) -> Result<FieldValue> {
        let current = self.get_field_value(id).await?;

        if let Some(data) = &data {
            check_field_data(&current.field_name, current.field_type, data)?;
        }

        let slots = ValueSlots::from_data(data.as_ref());

        let value = sqlx::query_as::<_, FieldValue>(
            r#"
            UPDATE field_values
            SET text_value = ?, number_value = ?, date_value = ?, bool_value = ?
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(slots.text)
        .bind(slots.number)
        .bind(slots.date)
        .bind(slots.boolean)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::FieldValueNotFound(id.to_string()))?;

        tracing::debug!("Set field value: {} ({})", id, value.field_name);
        Ok(value)
    }

    // ===== Photos =====

    /// Append a photo to an item
    pub async fn create_photo(
        &self,
        item_id: &str,
        blob_hash: &str,
        size: i64,
        caption: Option<&str>,
    ) -> Result<ItemPhoto> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let exists: Option<String> =
            sqlx::query_scalar("SELECT id FROM catalogue_items WHERE id = ?")
                .bind(item_id)
                .fetch_optional(&mut *tx)
                .await?;

        if exists.is_none() {
            return Err(AppError::ItemNotFound(item_id.to_string()));
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_photos WHERE item_id = ?")
            .bind(item_id)
            .fetch_one(&mut *tx)
            .await?;

        let photo = sqlx::query_as::<_, ItemPhoto>(
            r#"
            INSERT INTO item_photos (id, item_id, blob_hash, size, sort_order, caption, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&id)
        .bind(item_id)
        .bind(blob_hash)
        .bind(size)
        .bind(count)
        .bind(caption)
        .bind(timestamp(now))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!("Created photo: {} for item: {}", id, item_id);
        Ok(photo)
    }

    /// Get a photo by ID
    pub async fn get_photo(&self, id: &str) -> Result<ItemPhoto> {
        sqlx::query_as::<_, ItemPhoto>("SELECT * FROM item_photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))
    }

    /// Photos of an item in display order
    pub async fn list_photos(&self, item_id: &str) -> Result<Vec<ItemPhoto>> {
        let photos = sqlx::query_as::<_, ItemPhoto>(
            r#"
            SELECT * FROM item_photos WHERE item_id = ? ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    /// Set or clear a photo caption
    pub async fn update_photo_caption(&self, id: &str, caption: Option<&str>) -> Result<ItemPhoto> {
        let photo = sqlx::query_as::<_, ItemPhoto>(
            "UPDATE item_photos SET caption = ? WHERE id = ? RETURNING *",
        )
        .bind(caption)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))?;

        tracing::debug!("Updated caption of photo: {}", id);
        Ok(photo)
    }

    /// Reorder an item's photos; `ordered_ids` must list every photo exactly once
    pub async fn reorder_photos(&self, item_id: &str, ordered_ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let mut current: Vec<String> =
            sqlx::query_scalar("SELECT id FROM item_photos WHERE item_id = ?")
                .bind(item_id)
                .fetch_all(&mut *tx)
                .await?;

        let mut requested = ordered_ids.to_vec();
        current.sort();
        requested.sort();

        if current != requested {
            return Err(AppError::Validation(format!(
                "Photo order for item {} must list each of its {} photos once",
                item_id,
                current.len()
            )));
        }

        for (index, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE item_photos SET sort_order = ? WHERE id = ?")
                .bind(index as i64)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Reordered {} photos of item: {}", ordered_ids.len(), item_id);
        Ok(())
    }

    /// Delete a photo and renumber the rest. Returns its blob hash.
    pub async fn delete_photo(&self, id: &str) -> Result<String> {
        let mut tx = self.pool.begin().await?;

        let photo = sqlx::query_as::<_, ItemPhoto>("SELECT * FROM item_photos WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::PhotoNotFound(id.to_string()))?;

        sqlx::query("DELETE FROM item_photos WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        renumber_photos(&mut tx, &photo.item_id).await?;

        tx.commit().await?;

        tracing::debug!("Deleted photo: {}", id);
        Ok(photo.blob_hash)
    }

    /// Number of photo rows pointing at a blob
    pub async fn count_blob_references(&self, blob_hash: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_photos WHERE blob_hash = ?")
            .bind(blob_hash)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
