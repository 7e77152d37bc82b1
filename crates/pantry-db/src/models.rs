//! Database row types. These map directly to SQLite rows and are converted
//! into pantry-types models at the edge, so the schema can differ from the
//! domain shape (UUIDs and dates as text, lists as JSON text).

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::Row;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use pantry_types::{
    InventoryItem, Notification, PopularRecipe, Recipe, RecipeSuggestion, SavedRecipe, ScanRecord,
    SuggestedRecipe, UserRecipe,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

// -- Conversions --

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("bad timestamp '{}'", raw))?
        .with_timezone(&Utc))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).with_context(|| format!("bad date '{}'", raw))
}

fn parse_uuid(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("bad uuid '{}'", raw))
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn from_json<T: DeserializeOwned>(raw: &str, column: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("bad JSON in column {}", column))
}

/// Prefix every column in a comma-separated list with `alias.`.
pub fn qualified(alias: &str, columns: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{}.{}", alias, c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

// -- Inventory --

pub struct ItemRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit: String,
    pub location: String,
    pub expiry_date: String,
    pub added_date: String,
    pub is_consumed: bool,
    pub ai_confidence: Option<f64>,
    pub metadata: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl ItemRow {
    pub const COLUMNS: &'static str = "id, user_id, name, category, quantity, unit, location, \
        expiry_date, added_date, is_consumed, ai_confidence, metadata, created_at, updated_at";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            quantity: row.get(4)?,
            unit: row.get(5)?,
            location: row.get(6)?,
            expiry_date: row.get(7)?,
            added_date: row.get(8)?,
            is_consumed: row.get(9)?,
            ai_confidence: row.get(10)?,
            metadata: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }

    pub fn into_model(self) -> Result<InventoryItem> {
        Ok(InventoryItem {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            name: self.name,
            category: self.category,
            quantity: u32::try_from(self.quantity).unwrap_or(0),
            unit: self.unit,
            location: self.location,
            expiry_date: parse_date(&self.expiry_date)?,
            added_date: parse_date(&self.added_date)?,
            consumed: self.is_consumed,
            ai_confidence: self.ai_confidence.map(|c| c as f32),
            metadata: self
                .metadata
                .as_deref()
                .map(|m| from_json(m, "metadata"))
                .transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

// -- Notifications --

pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub item_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub priority: String,
    pub is_read: bool,
    pub scheduled_for: String,
    pub created_at: String,
}

impl NotificationRow {
    pub const COLUMNS: &'static str =
        "id, user_id, item_id, kind, title, body, priority, is_read, scheduled_for, created_at";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            item_id: row.get(2)?,
            kind: row.get(3)?,
            title: row.get(4)?,
            body: row.get(5)?,
            priority: row.get(6)?,
            is_read: row.get(7)?,
            scheduled_for: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    pub fn into_model(self) -> Result<Notification> {
        Ok(Notification {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            item_id: parse_uuid(&self.item_id)?,
            kind: self.kind.parse()?,
            title: self.title,
            body: self.body,
            priority: self.priority.parse()?,
            read: self.is_read,
            scheduled_for: parse_timestamp(&self.scheduled_for)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

// -- Recipes --

pub struct RecipeRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub ingredients: String,
    pub instructions: String,
    pub prep_minutes: i64,
    pub cook_minutes: i64,
    pub servings: i64,
    pub difficulty: String,
    pub cuisine: Option<String>,
    pub tags: String,
    pub nutrition: Option<String>,
    pub source: String,
    pub is_public: bool,
    pub created_at: String,
}

impl RecipeRow {
    pub const COLUMNS: &'static str = "id, name, description, ingredients, instructions, \
        prep_minutes, cook_minutes, servings, difficulty, cuisine, tags, nutrition, source, \
        is_public, created_at";
    pub const WIDTH: usize = 15;

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Self::from_row_at(row, 0)
    }

    /// Read the recipe columns starting at column `at` (for joins).
    pub fn from_row_at(row: &Row<'_>, at: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(at)?,
            name: row.get(at + 1)?,
            description: row.get(at + 2)?,
            ingredients: row.get(at + 3)?,
            instructions: row.get(at + 4)?,
            prep_minutes: row.get(at + 5)?,
            cook_minutes: row.get(at + 6)?,
            servings: row.get(at + 7)?,
            difficulty: row.get(at + 8)?,
            cuisine: row.get(at + 9)?,
            tags: row.get(at + 10)?,
            nutrition: row.get(at + 11)?,
            source: row.get(at + 12)?,
            is_public: row.get(at + 13)?,
            created_at: row.get(at + 14)?,
        })
    }

    pub fn into_model(self) -> Result<Recipe> {
        Ok(Recipe {
            id: parse_uuid(&self.id)?,
            name: self.name,
            description: self.description,
            ingredients: from_json(&self.ingredients, "ingredients")?,
            instructions: from_json(&self.instructions, "instructions")?,
            prep_minutes: u32::try_from(self.prep_minutes).unwrap_or(0),
            cook_minutes: u32::try_from(self.cook_minutes).unwrap_or(0),
            servings: u32::try_from(self.servings).unwrap_or(1),
            difficulty: self.difficulty.parse()?,
            cuisine: self.cuisine,
            tags: from_json(&self.tags, "tags")?,
            nutrition: self
                .nutrition
                .as_deref()
                .map(|n| from_json(n, "nutrition"))
                .transpose()?,
            source: self.source.parse()?,
            public: self.is_public,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

// -- Suggestions --

pub struct SuggestionRow {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub matched_ingredients: String,
    pub score: i64,
    pub matched_count: i64,
    pub total_count: i64,
    pub is_viewed: bool,
    pub is_accepted: bool,
    pub suggested_at: String,
}

impl SuggestionRow {
    pub const COLUMNS: &'static str = "id, user_id, recipe_id, matched_ingredients, score, \
        matched_count, total_count, is_viewed, is_accepted, suggested_at";
    pub const WIDTH: usize = 10;

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recipe_id: row.get(2)?,
            matched_ingredients: row.get(3)?,
            score: row.get(4)?,
            matched_count: row.get(5)?,
            total_count: row.get(6)?,
            is_viewed: row.get(7)?,
            is_accepted: row.get(8)?,
            suggested_at: row.get(9)?,
        })
    }

    pub fn into_model(self) -> Result<RecipeSuggestion> {
        Ok(RecipeSuggestion {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            recipe_id: parse_uuid(&self.recipe_id)?,
            matched_ingredients: from_json(&self.matched_ingredients, "matched_ingredients")?,
            score: u8::try_from(self.score).unwrap_or(0),
            matched_count: u32::try_from(self.matched_count).unwrap_or(0),
            total_count: u32::try_from(self.total_count).unwrap_or(0),
            viewed: self.is_viewed,
            accepted: self.is_accepted,
            suggested_at: parse_timestamp(&self.suggested_at)?,
        })
    }
}

/// A suggestion joined with its recipe.
pub struct SuggestedRecipeRow {
    pub suggestion: SuggestionRow,
    pub recipe: RecipeRow,
}

impl SuggestedRecipeRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            suggestion: SuggestionRow::from_row(row)?,
            recipe: RecipeRow::from_row_at(row, SuggestionRow::WIDTH)?,
        })
    }

    pub fn into_model(self) -> Result<SuggestedRecipe> {
        Ok(SuggestedRecipe {
            suggestion: self.suggestion.into_model()?,
            recipe: self.recipe.into_model()?,
        })
    }
}

// -- Recipe book --

pub struct SavedRecipeRow {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub rating: Option<i64>,
    pub notes: Option<String>,
    pub is_favorite: bool,
    pub times_cooked: i64,
    pub last_made: Option<String>,
    pub saved_at: String,
}

impl SavedRecipeRow {
    pub const COLUMNS: &'static str = "id, user_id, recipe_id, rating, notes, is_favorite, \
        times_cooked, last_made, saved_at";
    pub const WIDTH: usize = 9;

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recipe_id: row.get(2)?,
            rating: row.get(3)?,
            notes: row.get(4)?,
            is_favorite: row.get(5)?,
            times_cooked: row.get(6)?,
            last_made: row.get(7)?,
            saved_at: row.get(8)?,
        })
    }

    pub fn into_model(self) -> Result<SavedRecipe> {
        Ok(SavedRecipe {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            recipe_id: parse_uuid(&self.recipe_id)?,
            rating: self.rating.and_then(|r| u8::try_from(r).ok()),
            notes: self.notes,
            favorite: self.is_favorite,
            times_cooked: u32::try_from(self.times_cooked).unwrap_or(0),
            last_made: self.last_made.as_deref().map(parse_date).transpose()?,
            saved_at: parse_timestamp(&self.saved_at)?,
        })
    }
}

/// A saved entry joined with its recipe.
pub struct UserRecipeRow {
    pub saved: SavedRecipeRow,
    pub recipe: RecipeRow,
}

impl UserRecipeRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            saved: SavedRecipeRow::from_row(row)?,
            recipe: RecipeRow::from_row_at(row, SavedRecipeRow::WIDTH)?,
        })
    }

    pub fn into_model(self) -> Result<UserRecipe> {
        Ok(UserRecipe {
            saved: self.saved.into_model()?,
            recipe: self.recipe.into_model()?,
        })
    }
}

/// Recipe columns followed by `AVG(rating)` and `COUNT(rating)`.
pub struct PopularRecipeRow {
    pub recipe: RecipeRow,
    pub average_rating: Option<f64>,
    pub rating_count: i64,
}

impl PopularRecipeRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            recipe: RecipeRow::from_row(row)?,
            average_rating: row.get(RecipeRow::WIDTH)?,
            rating_count: row.get(RecipeRow::WIDTH + 1)?,
        })
    }

    pub fn into_model(self) -> Result<PopularRecipe> {
        Ok(PopularRecipe {
            recipe: self.recipe.into_model()?,
            average_rating: self.average_rating,
            rating_count: u32::try_from(self.rating_count).unwrap_or(0),
        })
    }
}

// -- Scans --

pub struct ScanRow {
    pub id: String,
    pub user_id: String,
    pub recognized_items: String,
    pub processing_ms: i64,
    pub success: bool,
    pub error: Option<String>,
    pub scanned_at: String,
}

impl ScanRow {
    pub const COLUMNS: &'static str =
        "id, user_id, recognized_items, processing_ms, success, error, scanned_at";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recognized_items: row.get(2)?,
            processing_ms: row.get(3)?,
            success: row.get(4)?,
            error: row.get(5)?,
            scanned_at: row.get(6)?,
        })
    }

    pub fn into_model(self) -> Result<ScanRecord> {
        Ok(ScanRecord {
            id: parse_uuid(&self.id)?,
            user_id: parse_uuid(&self.user_id)?,
            recognized_items: from_json(&self.recognized_items, "recognized_items")?,
            processing_ms: u64::try_from(self.processing_ms).unwrap_or(0),
            success: self.success,
            error: self.error,
            scanned_at: parse_timestamp(&self.scanned_at)?,
        })
    }
}
