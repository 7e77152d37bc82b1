use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generated::RecognizedItem;

/// Returned when a stored enum column holds an unknown value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// -- Inventory --

/// A grocery item on hand. Consuming an item sets `consumed`; rows are never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub unit: String,
    pub location: String,
    pub expiry_date: NaiveDate,
    pub added_date: NaiveDate,
    pub consumed: bool,
    /// Recognition confidence in `0.0..=1.0` when the item came from a scan.
    pub ai_confidence: Option<f32>,
    pub metadata: Option<ItemMetadata>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
}

// -- Notifications --

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(ParseEnumError::new("priority", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ExpiryWarning,
}

impl NotificationKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ExpiryWarning => "expiry_warning",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expiry_warning" => Ok(Self::ExpiryWarning),
            other => Err(ParseEnumError::new("notification kind", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub read: bool,
    pub scheduled_for: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

// -- Recipes --

/// Difficulty keeps its capitalized form on the wire ("Easy", "Medium", "Hard").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseEnumError;

    /// Case-insensitive, since generated recipes are not always consistent.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseEnumError::new("difficulty", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeSource {
    Seed,
    AiGenerated,
    User,
}

impl RecipeSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::AiGenerated => "ai_generated",
            Self::User => "user",
        }
    }
}

impl FromStr for RecipeSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seed" => Ok(Self::Seed),
            "ai_generated" => Ok(Self::AiGenerated),
            "user" => Ok(Self::User),
            other => Err(ParseEnumError::new("recipe source", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub protein: Option<f64>,
    #[serde(default)]
    pub carbs: Option<f64>,
    #[serde(default)]
    pub fat: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Free-text lines such as "2 ripe bananas"; order is preserved.
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
    pub created_at: DateTime<Utc>,
}

// -- Suggestions --

/// One matching computation against the catalog. Never recomputed in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    pub matched_ingredients: Vec<String>,
    /// Rounded percentage, `0..=100`.
    pub score: u8,
    pub matched_count: u32,
    pub total_count: u32,
    pub viewed: bool,
    pub accepted: bool,
    pub suggested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRecipe {
    pub suggestion: RecipeSuggestion,
    pub recipe: Recipe,
}

// -- Recipe book --

/// A recipe kept in a user's book, with their rating and cooking history.
/// At most one per (user, recipe).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipe_id: Uuid,
    /// `1..=5` when rated.
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub favorite: bool,
    pub times_cooked: u32,
    pub last_made: Option<NaiveDate>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecipe {
    pub saved: SavedRecipe,
    pub recipe: Recipe,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularRecipe {
    pub recipe: Recipe,
    /// `None` when nobody has rated it.
    pub average_rating: Option<f64>,
    pub rating_count: u32,
}

// -- Scans --

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recognized_items: Vec<RecognizedItem>,
    pub processing_ms: u64,
    pub success: bool,
    pub error: Option<String>,
    pub scanned_at: DateTime<Utc>,
}
