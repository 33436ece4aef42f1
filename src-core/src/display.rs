//! Derived display values
//!
//! Pure functions turning stored field values and photos into what a
//! presentation layer shows. None of them can fail.

use crate::config::UNTITLED_ITEM;
use crate::database::{FieldData, FieldType, FieldValue, ItemPhoto};
use chrono::{Local, TimeZone};

/// Abbreviated date, e.g. "Feb 20, 2026"
const DATE_FORMAT: &str = "%b %-d, %Y";

impl FieldValue {
    /// Render the value for display, dates in the local timezone
    pub fn display_value(&self) -> String {
        self.display_value_in(&Local)
    }

    /// Render the value for display, dates in `tz`.
    ///
    /// Numbers use two decimal places and booleans "Yes"/"No". An unset
    /// boolean reads as "No", any other unset value as an empty string.
    pub fn display_value_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match (self.field_type, &self.data) {
            (FieldType::Text, Some(FieldData::Text(text))) => text.clone(),
            (FieldType::Number, Some(FieldData::Number(number))) => format!("{:.2}", number),
            (FieldType::Date, Some(FieldData::Date(date))) => {
                date.with_timezone(tz).format(DATE_FORMAT).to_string()
            }
            (FieldType::Boolean, Some(FieldData::Boolean(true))) => "Yes".to_string(),
            (FieldType::Boolean, _) => "No".to_string(),
            _ => String::new(),
        }
    }

    /// Non-empty text of a text-typed value
    fn non_empty_text(&self) -> Option<&str> {
        match (self.field_type, &self.data) {
            (FieldType::Text, Some(FieldData::Text(text))) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

/// Name of an item: its first non-empty text value by sort order.
///
/// Values sharing a sort order are taken in ID order.
pub fn display_name(values: &[FieldValue]) -> String {
    let mut texts: Vec<&FieldValue> = values
        .iter()
        .filter(|v| v.field_type == FieldType::Text)
        .collect();

    texts.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));

    texts
        .into_iter()
        .find_map(FieldValue::non_empty_text)
        .map(str::to_string)
        .unwrap_or_else(|| UNTITLED_ITEM.to_string())
}

/// Photo with the lowest sort order
pub fn primary_photo(photos: &[ItemPhoto]) -> Option<&ItemPhoto> {
    photos
        .iter()
        .min_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)))
}
