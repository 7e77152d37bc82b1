use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generated::RecognizedItem;
use crate::models::{Difficulty, ItemMetadata, NotificationKind, Nutrition, Priority, RecipeSource};

// -- Inventory --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewInventoryItem {
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub location: String,
    pub expiry_date: NaiveDate,
    pub added_date: NaiveDate,
    #[serde(default)]
    pub ai_confidence: Option<f32>,
    #[serde(default)]
    pub metadata: Option<ItemMetadata>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub metadata: Option<ItemMetadata>,
}

impl ItemChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.location.is_none()
            && self.expiry_date.is_none()
            && self.metadata.is_none()
    }
}

// -- Notifications --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub scheduled_for: DateTime<Utc>,
}

// -- Recipes --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub prep_minutes: u32,
    pub cook_minutes: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub cuisine: Option<String>,
    pub tags: Vec<String>,
    pub nutrition: Option<Nutrition>,
    pub source: RecipeSource,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSuggestion {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub matched_ingredients: Vec<String>,
    pub score: u8,
    pub matched_count: u32,
    pub total_count: u32,
}

// -- Recipe book --

/// Save (or re-save) a recipe to a user's book. `None` fields keep the
/// stored value on an existing entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRecipe {
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub favorite: Option<bool>,
    pub times_cooked: Option<u32>,
    pub last_made: Option<NaiveDate>,
}

// -- Scans --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewScanRecord {
    pub user_id: Uuid,
    pub recognized_items: Vec<RecognizedItem>,
    pub processing_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

// -- Dashboard --

/// Dashboard summary. `waste_reduced` and `money_saved` are presentation
/// placeholders and carry no computed meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryStats {
    pub total_items: u64,
    pub expiring_items: u64,
    pub recent_scans: u64,
    pub waste_reduced: u32,
    pub money_saved: u32,
}
