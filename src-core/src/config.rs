//! Application configuration constants
//!
//! Central location for file layout, editor defaults, display placeholders
//! and validation boundaries used throughout the application.

// ===== Data Directory Layout =====

/// SQLite database file inside the app data directory
pub const DATABASE_FILENAME: &str = "catalogue.sqlite";

/// Directory holding content-addressed photo blobs
pub const BLOBS_DIRNAME: &str = "blobs";

/// JSON settings file inside the app data directory
pub const SETTINGS_FILENAME: &str = "settings.json";

// ===== Display =====

/// Shown for an item with no non-empty text field
pub const UNTITLED_ITEM: &str = "Untitled Item";

// ===== Editor Defaults =====

/// Icon preselected for a new catalogue
pub const DEFAULT_ICON_NAME: &str = "square.grid.2x2";

/// Color preselected for a new catalogue (system blue)
pub const DEFAULT_COLOR_HEX: &str = "#007AFF";

/// Name of the text field every new catalogue starts with
pub const DEFAULT_FIELD_NAME: &str = "Name";

// ===== Validation Limits =====

/// Maximum length of an icon name in settings
pub const MAX_ICON_NAME_LENGTH: usize = 100;

/// Maximum length of a default field name in settings
pub const MAX_FIELD_NAME_LENGTH: usize = 100;

/// Maximum number of default fields a new catalogue can be seeded with
pub const MAX_DEFAULT_FIELDS: usize = 32;

// ===== Icons =====

/// Curated catalogue icons, grouped by category
pub const ICON_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Collections",
        &["square.grid.2x2", "square.grid.3x3", "rectangle.grid.3x2", "circle.grid.3x3"],
    ),
    (
        "Objects",
        &["star.fill", "heart.fill", "bookmark.fill", "flag.fill", "tag.fill"],
    ),
    (
        "Items",
        &["photo.fill", "book.fill", "magazine.fill", "newspaper.fill", "doc.fill"],
    ),
    (
        "Sports",
        &[
            "sportscourt.fill",
            "baseball.fill",
            "football.fill",
            "basketball.fill",
            "tennisball.fill",
        ],
    ),
    (
        "Entertainment",
        &["tv.fill", "music.note", "film.fill", "gamecontroller.fill", "guitars.fill"],
    ),
    (
        "Nature",
        &["leaf.fill", "tree.fill", "globe.americas.fill", "cloud.fill", "moon.fill"],
    ),
    (
        "Transportation",
        &["car.fill", "airplane", "train.side.front.car", "sailboat.fill", "bicycle"],
    ),
    (
        "Food",
        &[
            "cup.and.saucer.fill",
            "fork.knife",
            "wineglass.fill",
            "birthday.cake.fill",
            "takeoutbag.and.cup.and.straw.fill",
        ],
    ),
    (
        "Shopping",
        &["bag.fill", "cart.fill", "creditcard.fill", "giftcard.fill", "basket.fill"],
    ),
    (
        "Other",
        &["hammer.fill", "wrench.fill", "paintbrush.fill", "scissors", "keyboard.fill"],
    ),
];
