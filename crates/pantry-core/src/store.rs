use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use pantry_types::{
    InventoryItem, ItemChanges, NewInventoryItem, NewNotification, NewRecipe, NewScanRecord,
    NewSuggestion, Notification, NotificationKind, PopularRecipe, Recipe, RecipeSuggestion,
    SaveRecipe, SavedRecipe, ScanRecord, SuggestedRecipe, UserRecipe,
};

/// Read/write contract the core needs from persistence.
///
/// Methods are blocking; async callers go through [`blocking`] so a slow
/// store never stalls the runtime's worker threads.
pub trait PantryStore: Send + Sync {
    // -- Inventory --

    fn insert_item(&self, item: &NewInventoryItem) -> Result<InventoryItem>;

    fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>>;

    /// Returns `None` when no item has this id.
    fn update_item(&self, id: Uuid, changes: &ItemChanges) -> Result<Option<InventoryItem>>;

    /// Soft consume. Returns `false` if the item is unknown or already consumed.
    fn consume_item(&self, id: Uuid) -> Result<bool>;

    /// Non-consumed items, newest first.
    fn active_items(&self, user_id: Uuid, limit: u32) -> Result<Vec<InventoryItem>>;

    /// Non-consumed items with `expiry_date <= through`, soonest first.
    fn items_expiring_by(&self, user_id: Uuid, through: NaiveDate) -> Result<Vec<InventoryItem>>;

    /// Case-insensitive match on name, category or location.
    fn search_items(&self, user_id: Uuid, query: &str, limit: u32) -> Result<Vec<InventoryItem>>;

    fn items_by_category(&self, user_id: Uuid, category: &str) -> Result<Vec<InventoryItem>>;

    fn items_by_location(&self, user_id: Uuid, location: &str) -> Result<Vec<InventoryItem>>;

    fn count_active_items(&self, user_id: Uuid) -> Result<u64>;

    /// Every item row, consumed or not, across all users.
    fn count_items(&self) -> Result<u64>;

    // -- Notifications --

    fn has_unread_notification(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: NotificationKind,
    ) -> Result<bool>;

    fn insert_notification(&self, notification: &NewNotification) -> Result<Notification>;

    /// Newest first.
    fn notifications(&self, user_id: Uuid, unread_only: bool, limit: u32)
    -> Result<Vec<Notification>>;

    fn mark_notification_read(&self, id: Uuid) -> Result<bool>;

    // -- Recipes --

    fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe>;

    fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>>;

    /// Public catalog in catalog order (newest first).
    fn public_recipes(&self, limit: u32) -> Result<Vec<Recipe>>;

    /// Public recipes whose name, description or cuisine contains `query`.
    fn search_recipes(&self, query: &str, limit: u32) -> Result<Vec<Recipe>>;

    /// Every recipe row, public or not.
    fn count_recipes(&self) -> Result<u64>;

    // -- Recipe book --

    /// Insert or update the (user, recipe) entry and refresh `saved_at`.
    /// Fields left `None` keep their stored value.
    fn save_recipe(&self, save: &SaveRecipe) -> Result<SavedRecipe>;

    /// Set the rating, creating the entry if needed. `notes = None` keeps the
    /// stored notes.
    fn rate_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        rating: u8,
        notes: Option<&str>,
    ) -> Result<SavedRecipe>;

    /// The user's book, most recently saved first.
    fn user_recipes(&self, user_id: Uuid) -> Result<Vec<UserRecipe>>;

    /// Public recipes by average rating, unrated ones last.
    fn popular_recipes(&self, limit: u32) -> Result<Vec<PopularRecipe>>;

    // -- Suggestions --

    /// Stores a suggestion. Older suggestions for the same (user, recipe)
    /// that were never viewed or accepted are retired in the same write.
    fn insert_suggestion(&self, suggestion: &NewSuggestion) -> Result<RecipeSuggestion>;

    /// Unviewed suggestions joined with their recipe, best score first, then newest.
    fn unviewed_suggestions(&self, user_id: Uuid, limit: u32) -> Result<Vec<SuggestedRecipe>>;

    fn mark_suggestion_viewed(&self, id: Uuid) -> Result<bool>;

    /// Accepting also marks the suggestion viewed.
    fn accept_suggestion(&self, id: Uuid) -> Result<bool>;

    // -- Scans --

    fn insert_scan(&self, scan: &NewScanRecord) -> Result<ScanRecord>;

    fn count_scans_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<u64>;

    /// Newest first.
    fn recent_scans(&self, user_id: Uuid, limit: u32) -> Result<Vec<ScanRecord>>;
}

pub type SharedStore = Arc<dyn PantryStore>;

/// Run a store call on the blocking pool.
pub async fn blocking<F, T>(store: &SharedStore, f: F) -> Result<T>
where
    F: FnOnce(&dyn PantryStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {}", e))?
}
