/// Pantry value objects shared by the core, the SQLite store and the CLI.
///
/// - `models`: persisted entities (inventory, notifications, recipes, suggestions,
///   saved recipes, scans)
/// - `api`: insert/update payloads and computed summaries
/// - `generated`: JSON shapes expected back from the text-generation provider

pub mod api;
pub mod generated;
pub mod models;

pub use api::{
    GroceryStats, ItemChanges, NewInventoryItem, NewNotification, NewRecipe, NewScanRecord,
    NewSuggestion, SaveRecipe,
};
pub use generated::{GeneratedRecipe, NutritionFacts, RecognizedItem};
pub use models::{
    Difficulty, InventoryItem, ItemMetadata, Notification, NotificationKind, Nutrition,
    ParseEnumError, PopularRecipe, Priority, Recipe, RecipeSource, RecipeSuggestion,
    SavedRecipe, ScanRecord, SuggestedRecipe, UserRecipe,
};
