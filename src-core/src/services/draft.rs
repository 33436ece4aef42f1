//! Catalogue editor draft
//!
//! In-memory state of the create/edit catalogue form. Every list mutation
//! reassigns `sort_order = index` across the whole field list, so drafts
//! never carry gaps or duplicate positions.

use crate::color::Color;
use crate::database::{Catalogue, FieldDefinition, FieldType, NewFieldDefinition};
use crate::services::settings::EditorDefaults;

/// A field definition being edited
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinitionDraft {
    pub name: String,
    pub field_type: FieldType,
    pub sort_order: i64,
}

/// Editable catalogue details and field list
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueDraft {
    pub name: String,
    pub icon_name: String,
    pub color: Color,
    pub fields: Vec<FieldDefinitionDraft>,
}

impl CatalogueDraft {
    /// Empty draft for a new catalogue, seeded from editor defaults
    pub fn new(defaults: &EditorDefaults) -> Self {
        let mut draft = Self {
            name: String::new(),
            icon_name: defaults.icon_name.clone(),
            color: Color::from_hex(&defaults.color_hex),
            fields: Vec::new(),
        };

        for field in &defaults.fields {
            draft.append_field(&field.name, field.field_type);
        }

        draft
    }

    /// Draft pre-filled from a stored catalogue
    pub fn from_existing(catalogue: &Catalogue, definitions: &[FieldDefinition]) -> Self {
        let mut sorted: Vec<&FieldDefinition> = definitions.iter().collect();
        sorted.sort_by_key(|d| d.sort_order);

        let mut draft = Self {
            name: catalogue.name.clone(),
            icon_name: catalogue.icon_name.clone(),
            color: catalogue.color(),
            fields: sorted
                .into_iter()
                .map(|d| FieldDefinitionDraft {
                    name: d.name.clone(),
                    field_type: d.field_type,
                    sort_order: d.sort_order,
                })
                .collect(),
        };
        draft.renumber();

        draft
    }

    /// A draft needs a name and at least one field before it can be saved
    pub fn can_save(&self) -> bool {
        !self.name.trim().is_empty() && !self.fields.is_empty()
    }

    /// Append a field at the end
    pub fn append_field(&mut self, name: &str, field_type: FieldType) {
        self.fields.push(FieldDefinitionDraft {
            name: name.to_string(),
            field_type,
            sort_order: self.fields.len() as i64,
        });
    }

    /// Remove the fields at `offsets`. Out of range offsets are ignored.
    pub fn remove_fields(&mut self, offsets: &[usize]) {
        let mut offsets: Vec<usize> = offsets
            .iter()
            .copied()
            .filter(|&i| i < self.fields.len())
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        for index in offsets.into_iter().rev() {
            self.fields.remove(index);
        }

        self.renumber();
    }

    /// Move the fields at `offsets` so they sit, in their current relative
    /// order, before the field that was at `destination`. A destination equal
    /// to the list length moves them to the end.
    pub fn move_fields(&mut self, offsets: &[usize], destination: usize) {
        let len = self.fields.len();
        let destination = destination.min(len);

        let mut offsets: Vec<usize> = offsets.iter().copied().filter(|&i| i < len).collect();
        offsets.sort_unstable();
        offsets.dedup();

        let before = offsets.iter().filter(|&&i| i < destination).count();

        let mut moved = Vec::with_capacity(offsets.len());
        for index in offsets.into_iter().rev() {
            moved.push(self.fields.remove(index));
        }
        moved.reverse();

        let insert_at = destination - before;
        self.fields.splice(insert_at..insert_at, moved);

        self.renumber();
    }

    /// Move a single field
    pub fn move_field(&mut self, from: usize, to: usize) {
        self.move_fields(&[from], to);
    }

    /// Field definitions to persist, numbered by position
    pub fn field_definitions(&self) -> Vec<NewFieldDefinition> {
        self.fields
            .iter()
            .enumerate()
            .map(|(index, field)| NewFieldDefinition {
                name: field.name.clone(),
                field_type: field.field_type,
                sort_order: index as i64,
            })
            .collect()
    }

    fn renumber(&mut self) {
        for (index, field) in self.fields.iter_mut().enumerate() {
            field.sort_order = index as i64;
        }
    }
}
