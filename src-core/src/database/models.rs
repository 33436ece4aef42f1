//! Database models
//!
//! Rust structs representing catalogue entities.
//! All models use serde for serialization to a presentation layer.

use crate::color::Color;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row};
use std::fmt;

/// Kind of value a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::Boolean,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Date => "Date",
            FieldType::Boolean => "Boolean",
        }
    }

    /// Symbol name shown next to fields of this type
    pub fn icon(&self) -> &'static str {
        match self {
            FieldType::Text => "textformat",
            FieldType::Number => "number",
            FieldType::Date => "calendar",
            FieldType::Boolean => "checkmark.circle",
        }
    }

    pub fn color_hex(&self) -> &'static str {
        match self {
            FieldType::Text => "#007AFF",
            FieldType::Number => "#34C759",
            FieldType::Date => "#FF9500",
            FieldType::Boolean => "#AF52DE",
        }
    }

    pub fn color(&self) -> Color {
        Color::from_hex(self.color_hex())
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-defined collection
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Catalogue {
    pub id: String,
    pub name: String,
    pub icon_name: String,
    /// Hex-encoded RGB, e.g. "#FF9500"
    pub color_hex: String,
    pub created_at: DateTime<Utc>,
}

impl Catalogue {
    pub fn color(&self) -> Color {
        Color::from_hex(&self.color_hex)
    }
}

/// A named, typed slot belonging to a catalogue
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FieldDefinition {
    pub id: String,
    pub catalogue_id: String,
    pub name: String,
    pub field_type: FieldType,
    pub sort_order: i64,
}

/// A single cataloged object, either owned or on the wishlist
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CatalogueItem {
    pub id: String,
    pub catalogue_id: String,
    pub is_wishlist: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The data held by a field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FieldData {
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    Boolean(bool),
}

impl FieldData {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldData::Text(_) => FieldType::Text,
            FieldData::Number(_) => FieldType::Number,
            FieldData::Date(_) => FieldType::Date,
            FieldData::Boolean(_) => FieldType::Boolean,
        }
    }
}

/// One field's data on one item.
///
/// `field_name` and `field_type` are copied from the field definition when the
/// value is created and never follow later edits to that definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldValue {
    pub id: String,
    pub item_id: String,
    pub field_name: String,
    pub field_type: FieldType,
    pub sort_order: i64,
    pub data: Option<FieldData>,
}

impl<'r> FromRow<'r, SqliteRow> for FieldValue {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let field_type: FieldType = row.try_get("field_type")?;

        // Only the slot matching the stored type is meaningful
        let data = match field_type {
            FieldType::Text => row
                .try_get::<Option<String>, _>("text_value")?
                .map(FieldData::Text),
            FieldType::Number => row
                .try_get::<Option<f64>, _>("number_value")?
                .map(FieldData::Number),
            FieldType::Date => row
                .try_get::<Option<DateTime<Utc>>, _>("date_value")?
                .map(FieldData::Date),
            FieldType::Boolean => row
                .try_get::<Option<bool>, _>("bool_value")?
                .map(FieldData::Boolean),
        };

        Ok(Self {
            id: row.try_get("id")?,
            item_id: row.try_get("item_id")?,
            field_name: row.try_get("field_name")?,
            field_type,
            sort_order: row.try_get("sort_order")?,
            data,
        })
    }
}

/// Photo attached to an item, bytes live in the blob store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemPhoto {
    pub id: String,
    pub item_id: String,
    /// SHA-256 hash of the image bytes
    pub blob_hash: String,
    pub size: i64,
    pub sort_order: i64,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create catalogue request, field drafts already numbered
#[derive(Debug, Deserialize)]
pub struct CreateCatalogueRequest {
    pub name: String,
    pub icon_name: String,
    pub color_hex: String,
    pub fields: Vec<NewFieldDefinition>,
}

/// Replace a catalogue's details and its full set of field definitions
#[derive(Debug, Deserialize)]
pub struct ReplaceCatalogueRequest {
    pub id: String,
    pub name: String,
    pub icon_name: String,
    pub color_hex: String,
    pub fields: Vec<NewFieldDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewFieldDefinition {
    pub name: String,
    pub field_type: FieldType,
    pub sort_order: i64,
}

/// Create item request; values are keyed by field definition ID
#[derive(Debug, Default, Deserialize)]
pub struct CreateItemRequest {
    pub catalogue_id: String,
    pub is_wishlist: bool,
    pub notes: Option<String>,
    pub values: Vec<(String, FieldData)>,
}

/// Update item request
#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub id: String,
    pub is_wishlist: Option<bool>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
}

/// Which items of a catalogue to list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemFilter {
    #[default]
    All,
    Owned,
    Wishlist,
}

impl ItemFilter {
    pub fn matches(&self, item: &CatalogueItem) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Owned => !item.is_wishlist,
            ItemFilter::Wishlist => item.is_wishlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_presentation() {
        let expected = [
            (FieldType::Text, "Text", "textformat", "#007AFF"),
            (FieldType::Number, "Number", "number", "#34C759"),
            (FieldType::Date, "Date", "calendar", "#FF9500"),
            (FieldType::Boolean, "Boolean", "checkmark.circle", "#AF52DE"),
        ];

        for (field_type, label, icon, color_hex) in expected {
            assert_eq!(field_type.label(), label);
            assert_eq!(field_type.to_string(), label);
            assert_eq!(field_type.icon(), icon);
            assert_eq!(field_type.color_hex(), color_hex);
            assert_eq!(field_type.color().to_hex(), color_hex);
        }

        assert_eq!(FieldType::Text.color().to_rgba8(), [0, 122, 255, 255]);
        assert_eq!(FieldType::Boolean.color().to_rgba8(), [175, 82, 222, 255]);
    }

    #[test]
    fn test_field_data_reports_its_type() {
        assert_eq!(FieldData::Text("x".to_string()).field_type(), FieldType::Text);
        assert_eq!(FieldData::Number(1.0).field_type(), FieldType::Number);
        assert_eq!(FieldData::Date(Utc::now()).field_type(), FieldType::Date);
        assert_eq!(FieldData::Boolean(false).field_type(), FieldType::Boolean);
    }

    #[test]
    fn test_item_filter_matches() {
        let item = |is_wishlist| CatalogueItem {
            id: "i".to_string(),
            catalogue_id: "c".to_string(),
            is_wishlist,
            notes: None,
            created_at: Utc::now(),
        };

        assert!(ItemFilter::All.matches(&item(true)));
        assert!(ItemFilter::Owned.matches(&item(false)));
        assert!(!ItemFilter::Owned.matches(&item(true)));
        assert!(ItemFilter::Wishlist.matches(&item(true)));
        assert!(!ItemFilter::Wishlist.matches(&item(false)));
    }
}
