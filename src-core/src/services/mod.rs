//! Services module
//!
//! Business logic services that coordinate between the presentation layer
//! and the repository.

pub mod catalogues;
pub mod draft;
pub mod items;
pub mod photos;
pub mod settings;

pub use catalogues::{CatalogueService, CatalogueSummary};
pub use draft::{CatalogueDraft, FieldDefinitionDraft};
pub use items::{ItemDetail, ItemsService};
pub use photos::PhotosService;
pub use settings::{AppSettings, DefaultField, EditorDefaults, SettingsService};
