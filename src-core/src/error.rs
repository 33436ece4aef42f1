//! Error types for Catalogue It
//!
//! All errors use thiserror for structured error handling.
//! These errors can be serialized to a presentation layer.

use crate::database::FieldType;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Catalogue not found: {0}")]
    CatalogueNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Field value not found: {0}")]
    FieldValueNotFound(String),

    #[error("Photo not found: {0}")]
    PhotoNotFound(String),

    #[error("Field '{field}' holds {expected} values, got {found}")]
    FieldTypeMismatch {
        field: String,
        expected: FieldType,
        found: FieldType,
    },

    #[error("Catalogue draft cannot be saved: {0}")]
    InvalidDraft(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Blob store error: {0}")]
    BlobStore(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serializes_to_message() {
        let error = AppError::FieldTypeMismatch {
            field: "Year".to_string(),
            expected: FieldType::Number,
            found: FieldType::Text,
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#""Field 'Year' holds Number values, got Text""#);

        let json = serde_json::to_string(&AppError::ItemNotFound("abc".to_string())).unwrap();
        assert_eq!(json, r#""Item not found: abc""#);
    }
}
