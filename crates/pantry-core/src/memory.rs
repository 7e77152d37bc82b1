//! In-memory `PantryStore` used by unit tests in this crate.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use pantry_types::{
    InventoryItem, ItemChanges, NewInventoryItem, NewNotification, NewRecipe, NewScanRecord,
    NewSuggestion, Notification, NotificationKind, PopularRecipe, Recipe, RecipeSuggestion,
    SaveRecipe, SavedRecipe, ScanRecord, SuggestedRecipe, UserRecipe,
};

use crate::store::PantryStore;

#[derive(Default)]
struct State {
    items: Vec<InventoryItem>,
    notifications: Vec<Notification>,
    recipes: Vec<Recipe>,
    suggestions: Vec<RecipeSuggestion>,
    saved: Vec<SavedRecipe>,
    scans: Vec<ScanRecord>,
}

impl State {
    /// Existing (user, recipe) entry, or a fresh unrated one.
    fn saved_entry(&mut self, user_id: Uuid, recipe_id: Uuid) -> &mut SavedRecipe {
        let pos = match self
            .saved
            .iter()
            .position(|s| s.user_id == user_id && s.recipe_id == recipe_id)
        {
            Some(pos) => pos,
            None => {
                self.saved.push(SavedRecipe {
                    id: Uuid::new_v4(),
                    user_id,
                    recipe_id,
                    rating: None,
                    notes: None,
                    favorite: false,
                    times_cooked: 0,
                    last_made: None,
                    saved_at: Utc::now(),
                });
                self.saved.len() - 1
            }
        };
        &mut self.saved[pos]
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    /// Notification inserts for these item ids fail.
    failing_items: Mutex<HashSet<Uuid>>,
    /// Every suggestion insert fails for these recipe ids.
    failing_recipes: Mutex<HashSet<Uuid>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_notifications_for(&self, item_id: Uuid) {
        self.failing_items.lock().unwrap().insert(item_id);
    }

    pub fn fail_suggestions_for(&self, recipe_id: Uuid) {
        self.failing_recipes.lock().unwrap().insert(recipe_id);
    }

    pub fn all_notifications(&self) -> Vec<Notification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn all_suggestions(&self) -> Vec<RecipeSuggestion> {
        self.state.lock().unwrap().suggestions.clone()
    }

    /// Backdate a scan so window queries can be exercised.
    pub fn insert_scan_at(&self, user_id: Uuid, scanned_at: DateTime<Utc>) {
        self.state.lock().unwrap().scans.push(ScanRecord {
            id: Uuid::new_v4(),
            user_id,
            recognized_items: Vec::new(),
            processing_ms: 0,
            success: true,
            error: None,
            scanned_at,
        });
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl PantryStore for MemoryStore {
    fn insert_item(&self, item: &NewInventoryItem) -> Result<InventoryItem> {
        let now = Utc::now();
        let row = InventoryItem {
            id: Uuid::new_v4(),
            user_id: item.user_id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
            location: item.location.clone(),
            expiry_date: item.expiry_date,
            added_date: item.added_date,
            consumed: false,
            ai_confidence: item.ai_confidence,
            metadata: item.metadata.clone(),
            created_at: now,
            updated_at: now,
        };
        self.state.lock().unwrap().items.push(row.clone());
        Ok(row)
    }

    fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>> {
        let state = self.state.lock().unwrap();
        Ok(state.items.iter().find(|i| i.id == id).cloned())
    }

    fn update_item(&self, id: Uuid, changes: &ItemChanges) -> Result<Option<InventoryItem>> {
        let mut state = self.state.lock().unwrap();
        let Some(item) = state.items.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            item.name = name.clone();
        }
        if let Some(category) = &changes.category {
            item.category = category.clone();
        }
        if let Some(quantity) = changes.quantity {
            item.quantity = quantity;
        }
        if let Some(unit) = &changes.unit {
            item.unit = unit.clone();
        }
        if let Some(location) = &changes.location {
            item.location = location.clone();
        }
        if let Some(expiry) = changes.expiry_date {
            item.expiry_date = expiry;
        }
        if let Some(metadata) = &changes.metadata {
            item.metadata = Some(metadata.clone());
        }
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    fn consume_item(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.items.iter_mut().find(|i| i.id == id && !i.consumed) {
            Some(item) => {
                item.consumed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn active_items(&self, user_id: Uuid, limit: u32) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id && !i.consumed)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn items_expiring_by(&self, user_id: Uuid, through: NaiveDate) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().unwrap();
        let mut items: Vec<_> = state
            .items
            .iter()
            .filter(|i| i.user_id == user_id && !i.consumed && i.expiry_date <= through)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.expiry_date);
        Ok(items)
    }

    fn search_items(&self, user_id: Uuid, query: &str, limit: u32) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id && !i.consumed)
            .filter(|i| {
                contains_ci(&i.name, query)
                    || contains_ci(&i.category, query)
                    || contains_ci(&i.location, query)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn items_by_category(&self, user_id: Uuid, category: &str) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id && !i.consumed && i.category == category)
            .cloned()
            .collect())
    }

    fn items_by_location(&self, user_id: Uuid, location: &str) -> Result<Vec<InventoryItem>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id && !i.consumed && i.location == location)
            .cloned()
            .collect())
    }

    fn count_active_items(&self, user_id: Uuid) -> Result<u64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .items
            .iter()
            .filter(|i| i.user_id == user_id && !i.consumed)
            .count() as u64)
    }

    fn count_items(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().items.len() as u64)
    }

    fn has_unread_notification(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: NotificationKind,
    ) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .any(|n| n.user_id == user_id && n.item_id == item_id && n.kind == kind && !n.read))
    }

    fn insert_notification(&self, notification: &NewNotification) -> Result<Notification> {
        if self
            .failing_items
            .lock()
            .unwrap()
            .contains(&notification.item_id)
        {
            bail!("simulated insert failure for item {}", notification.item_id);
        }
        let row = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            item_id: notification.item_id,
            kind: notification.kind,
            title: notification.title.clone(),
            body: notification.body.clone(),
            priority: notification.priority,
            read: false,
            scheduled_for: notification.scheduled_for,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().notifications.push(row.clone());
        Ok(row)
    }

    fn notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<Notification>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn insert_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let row = Recipe {
            id: Uuid::new_v4(),
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            prep_minutes: recipe.prep_minutes,
            cook_minutes: recipe.cook_minutes,
            servings: recipe.servings,
            difficulty: recipe.difficulty,
            cuisine: recipe.cuisine.clone(),
            tags: recipe.tags.clone(),
            nutrition: recipe.nutrition.clone(),
            source: recipe.source,
            public: recipe.public,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().recipes.push(row.clone());
        Ok(row)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        let state = self.state.lock().unwrap();
        Ok(state.recipes.iter().find(|r| r.id == id).cloned())
    }

    /// Insertion order stands in for catalog order here.
    fn public_recipes(&self, limit: u32) -> Result<Vec<Recipe>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .recipes
            .iter()
            .filter(|r| r.public)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn search_recipes(&self, query: &str, limit: u32) -> Result<Vec<Recipe>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .recipes
            .iter()
            .filter(|r| r.public)
            .filter(|r| {
                contains_ci(&r.name, query)
                    || r.description.as_deref().is_some_and(|d| contains_ci(d, query))
                    || r.cuisine.as_deref().is_some_and(|c| contains_ci(c, query))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn count_recipes(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().recipes.len() as u64)
    }

    fn save_recipe(&self, save: &SaveRecipe) -> Result<SavedRecipe> {
        let mut state = self.state.lock().unwrap();
        let entry = state.saved_entry(save.user_id, save.recipe_id);
        if save.rating.is_some() {
            entry.rating = save.rating;
        }
        if let Some(notes) = &save.notes {
            entry.notes = Some(notes.clone());
        }
        if let Some(favorite) = save.favorite {
            entry.favorite = favorite;
        }
        if let Some(times) = save.times_cooked {
            entry.times_cooked = times;
        }
        if save.last_made.is_some() {
            entry.last_made = save.last_made;
        }
        entry.saved_at = Utc::now();
        Ok(entry.clone())
    }

    fn rate_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        rating: u8,
        notes: Option<&str>,
    ) -> Result<SavedRecipe> {
        let mut state = self.state.lock().unwrap();
        let entry = state.saved_entry(user_id, recipe_id);
        entry.rating = Some(rating);
        if let Some(notes) = notes {
            entry.notes = Some(notes.to_string());
        }
        Ok(entry.clone())
    }

    fn user_recipes(&self, user_id: Uuid) -> Result<Vec<UserRecipe>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<UserRecipe> = state
            .saved
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                let recipe = state.recipes.iter().find(|r| r.id == s.recipe_id)?;
                Some(UserRecipe {
                    saved: s.clone(),
                    recipe: recipe.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.saved.saved_at.cmp(&a.saved.saved_at));
        Ok(rows)
    }

    fn popular_recipes(&self, limit: u32) -> Result<Vec<PopularRecipe>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<PopularRecipe> = state
            .recipes
            .iter()
            .rev()
            .filter(|r| r.public)
            .map(|recipe| {
                let ratings: Vec<f64> = state
                    .saved
                    .iter()
                    .filter(|s| s.recipe_id == recipe.id)
                    .filter_map(|s| s.rating.map(f64::from))
                    .collect();
                let count = ratings.len();
                PopularRecipe {
                    recipe: recipe.clone(),
                    average_rating: (count > 0).then(|| ratings.iter().sum::<f64>() / count as f64),
                    rating_count: count as u32,
                }
            })
            .collect();
        rows.sort_by(|a, b| match (a.average_rating, b.average_rating) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    fn insert_suggestion(&self, suggestion: &NewSuggestion) -> Result<RecipeSuggestion> {
        if self
            .failing_recipes
            .lock()
            .unwrap()
            .contains(&suggestion.recipe_id)
        {
            bail!("simulated insert failure for recipe {}", suggestion.recipe_id);
        }
        let mut state = self.state.lock().unwrap();
        state.suggestions.retain(|s| {
            !(s.user_id == suggestion.user_id
                && s.recipe_id == suggestion.recipe_id
                && !s.viewed
                && !s.accepted)
        });
        let row = RecipeSuggestion {
            id: Uuid::new_v4(),
            user_id: suggestion.user_id,
            recipe_id: suggestion.recipe_id,
            matched_ingredients: suggestion.matched_ingredients.clone(),
            score: suggestion.score,
            matched_count: suggestion.matched_count,
            total_count: suggestion.total_count,
            viewed: false,
            accepted: false,
            suggested_at: Utc::now(),
        };
        state.suggestions.push(row.clone());
        Ok(row)
    }

    fn unviewed_suggestions(&self, user_id: Uuid, limit: u32) -> Result<Vec<SuggestedRecipe>> {
        let state = self.state.lock().unwrap();
        let mut rows: Vec<SuggestedRecipe> = state
            .suggestions
            .iter()
            .filter(|s| s.user_id == user_id && !s.viewed)
            .filter_map(|s| {
                let recipe = state.recipes.iter().find(|r| r.id == s.recipe_id)?;
                Some(SuggestedRecipe {
                    suggestion: s.clone(),
                    recipe: recipe.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.suggestion
                .score
                .cmp(&a.suggestion.score)
                .then(b.suggestion.suggested_at.cmp(&a.suggestion.suggested_at))
        });
        rows.truncate(limit as usize);
        Ok(rows)
    }

    fn mark_suggestion_viewed(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.suggestions.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.viewed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn accept_suggestion(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        match state.suggestions.iter_mut().find(|s| s.id == id) {
            Some(s) => {
                s.viewed = true;
                s.accepted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn insert_scan(&self, scan: &NewScanRecord) -> Result<ScanRecord> {
        let row = ScanRecord {
            id: Uuid::new_v4(),
            user_id: scan.user_id,
            recognized_items: scan.recognized_items.clone(),
            processing_ms: scan.processing_ms,
            success: scan.success,
            error: scan.error.clone(),
            scanned_at: Utc::now(),
        };
        self.state.lock().unwrap().scans.push(row.clone());
        Ok(row)
    }

    fn count_scans_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<u64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .scans
            .iter()
            .filter(|s| s.user_id == user_id && s.scanned_at >= since)
            .count() as u64)
    }

    fn recent_scans(&self, user_id: Uuid, limit: u32) -> Result<Vec<ScanRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .scans
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Minimal refrigerator item for tests.
pub fn new_item(user_id: Uuid, name: &str, expiry_date: NaiveDate) -> NewInventoryItem {
    NewInventoryItem {
        user_id,
        name: name.to_string(),
        category: "Other".to_string(),
        quantity: 1,
        unit: "pieces".to_string(),
        location: "Refrigerator".to_string(),
        expiry_date,
        added_date: expiry_date,
        ai_confidence: None,
        metadata: None,
    }
}
