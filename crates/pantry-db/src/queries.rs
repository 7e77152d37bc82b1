use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::ToSql;
use rusqlite::{Connection, Params, params};
use uuid::Uuid;

use pantry_core::store::PantryStore;
use pantry_types::{
    InventoryItem, ItemChanges, NewInventoryItem, NewNotification, NewRecipe, NewScanRecord,
    NewSuggestion, Notification, NotificationKind, PopularRecipe, Recipe, RecipeSuggestion,
    SaveRecipe, SavedRecipe, ScanRecord, SuggestedRecipe, UserRecipe,
};

use crate::Database;
use crate::models::{
    ItemRow, NotificationRow, PopularRecipeRow, RecipeRow, SavedRecipeRow, ScanRow,
    SuggestedRecipeRow, SuggestionRow, UserRecipeRow, format_date, format_timestamp, qualified,
    to_json,
};

impl PantryStore for Database {
    // -- Inventory --

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
        let metadata = row.metadata.as_ref().map(to_json).transpose()?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO inventory_items (id, user_id, name, category, quantity, unit, location,
                     expiry_date, added_date, is_consumed, ai_confidence, metadata, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11, ?12, ?12)",
                params![
                    row.id.to_string(),
                    row.user_id.to_string(),
                    row.name,
                    row.category,
                    i64::from(row.quantity),
                    row.unit,
                    row.location,
                    format_date(row.expiry_date),
                    format_date(row.added_date),
                    row.ai_confidence.map(f64::from),
                    metadata,
                    format_timestamp(now),
                ],
            )?;
            Ok(())
        })?;
        Ok(row)
    }

    fn get_item(&self, id: Uuid) -> Result<Option<InventoryItem>> {
        self.with_conn(|conn| query_item(conn, id))
    }

    fn update_item(&self, id: Uuid, changes: &ItemChanges) -> Result<Option<InventoryItem>> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = &changes.name {
            sets.push("name = ?");
            values.push(Box::new(name.clone()));
        }
        if let Some(category) = &changes.category {
            sets.push("category = ?");
            values.push(Box::new(category.clone()));
        }
        if let Some(quantity) = changes.quantity {
            sets.push("quantity = ?");
            values.push(Box::new(i64::from(quantity)));
        }
        if let Some(unit) = &changes.unit {
            sets.push("unit = ?");
            values.push(Box::new(unit.clone()));
        }
        if let Some(location) = &changes.location {
            sets.push("location = ?");
            values.push(Box::new(location.clone()));
        }
        if let Some(expiry) = changes.expiry_date {
            sets.push("expiry_date = ?");
            values.push(Box::new(format_date(expiry)));
        }
        if let Some(metadata) = &changes.metadata {
            sets.push("metadata = ?");
            values.push(Box::new(to_json(metadata)?));
        }
        sets.push("updated_at = ?");
        values.push(Box::new(format_timestamp(Utc::now())));
        values.push(Box::new(id.to_string()));

        let sql = format!(
            "UPDATE inventory_items SET {} WHERE id = ?",
            sets.join(", ")
        );

        self.with_conn_mut(|conn| {
            let changed = conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?;
            if changed == 0 {
                return Ok(None);
            }
            query_item(conn, id)
        })
    }

    fn consume_item(&self, id: Uuid) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE inventory_items SET is_consumed = 1, updated_at = ?1
                 WHERE id = ?2 AND is_consumed = 0",
                params![format_timestamp(Utc::now()), id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    fn active_items(&self, user_id: Uuid, limit: u32) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            query_items(
                conn,
                "WHERE user_id = ?1 AND is_consumed = 0
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
                params![user_id.to_string(), limit],
            )
        })
    }

    fn items_expiring_by(&self, user_id: Uuid, through: NaiveDate) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            query_items(
                conn,
                "WHERE user_id = ?1 AND is_consumed = 0 AND expiry_date <= ?2
                 ORDER BY expiry_date ASC, name ASC",
                params![user_id.to_string(), format_date(through)],
            )
        })
    }

    fn search_items(&self, user_id: Uuid, query: &str, limit: u32) -> Result<Vec<InventoryItem>> {
        let pattern = like_pattern(query);
        self.with_conn(|conn| {
            query_items(
                conn,
                "WHERE user_id = ?1 AND is_consumed = 0
                   AND (name LIKE ?2 ESCAPE '\\'
                        OR category LIKE ?2 ESCAPE '\\'
                        OR location LIKE ?2 ESCAPE '\\')
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3",
                params![user_id.to_string(), pattern, limit],
            )
        })
    }

    fn items_by_category(&self, user_id: Uuid, category: &str) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            query_items(
                conn,
                "WHERE user_id = ?1 AND is_consumed = 0 AND category = ?2
                 ORDER BY created_at DESC, rowid DESC",
                params![user_id.to_string(), category],
            )
        })
    }

    fn items_by_location(&self, user_id: Uuid, location: &str) -> Result<Vec<InventoryItem>> {
        self.with_conn(|conn| {
            query_items(
                conn,
                "WHERE user_id = ?1 AND is_consumed = 0 AND location = ?2
                 ORDER BY created_at DESC, rowid DESC",
                params![user_id.to_string(), location],
            )
        })
    }

    fn count_active_items(&self, user_id: Uuid) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM inventory_items WHERE user_id = ?1 AND is_consumed = 0",
                [user_id.to_string()],
                |r| r.get(0),
            )?;
            Ok(n as u64)
        })
    }

    fn count_items(&self) -> Result<u64> {
        self.with_conn(|conn| count(conn, "inventory_items"))
    }

    // -- Notifications --

    fn has_unread_notification(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        kind: NotificationKind,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(
                     SELECT 1 FROM notifications
                     WHERE user_id = ?1 AND item_id = ?2 AND kind = ?3 AND is_read = 0
                 )",
                params![user_id.to_string(), item_id.to_string(), kind.as_str()],
                |r| r.get(0),
            )?;
            Ok(exists)
        })
    }

    fn insert_notification(&self, notification: &NewNotification) -> Result<Notification> {
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

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, item_id, kind, title, body, priority,
                     is_read, scheduled_for, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?9)",
                params![
                    row.id.to_string(),
                    row.user_id.to_string(),
                    row.item_id.to_string(),
                    row.kind.as_str(),
                    row.title,
                    row.body,
                    row.priority.as_str(),
                    format_timestamp(row.scheduled_for),
                    format_timestamp(row.created_at),
                ],
            )?;
            Ok(())
        })?;
        Ok(row)
    }

    fn notifications(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: u32,
    ) -> Result<Vec<Notification>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM notifications
                 WHERE user_id = ?1 AND (?2 = 0 OR is_read = 0)
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?3",
                NotificationRow::COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(
                    params![user_id.to_string(), unread_only, limit],
                    NotificationRow::from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(NotificationRow::into_model).collect()
        })
    }

    fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1",
                [id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Recipes --

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
        let ingredients = to_json(&row.ingredients)?;
        let instructions = to_json(&row.instructions)?;
        let tags = to_json(&row.tags)?;
        let nutrition = row.nutrition.as_ref().map(to_json).transpose()?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO recipes (id, name, description, ingredients, instructions,
                     prep_minutes, cook_minutes, servings, difficulty, cuisine, tags, nutrition,
                     source, is_public, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    row.id.to_string(),
                    row.name,
                    row.description,
                    ingredients,
                    instructions,
                    i64::from(row.prep_minutes),
                    i64::from(row.cook_minutes),
                    i64::from(row.servings),
                    row.difficulty.as_str(),
                    row.cuisine,
                    tags,
                    nutrition,
                    row.source.as_str(),
                    row.public,
                    format_timestamp(row.created_at),
                ],
            )?;
            Ok(())
        })?;
        Ok(row)
    }

    fn get_recipe(&self, id: Uuid) -> Result<Option<Recipe>> {
        self.with_conn(|conn| {
            let mut recipes = query_recipes(conn, "WHERE id = ?1", [id.to_string()])?;
            Ok(recipes.pop())
        })
    }

    fn public_recipes(&self, limit: u32) -> Result<Vec<Recipe>> {
        self.with_conn(|conn| {
            query_recipes(
                conn,
                "WHERE is_public = 1 ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                [limit],
            )
        })
    }

    fn search_recipes(&self, query: &str, limit: u32) -> Result<Vec<Recipe>> {
        let pattern = like_pattern(query);
        self.with_conn(|conn| {
            query_recipes(
                conn,
                "WHERE is_public = 1
                   AND (name LIKE ?1 ESCAPE '\\'
                        OR description LIKE ?1 ESCAPE '\\'
                        OR cuisine LIKE ?1 ESCAPE '\\')
                 ORDER BY created_at DESC, rowid DESC
                 LIMIT ?2",
                params![pattern, limit],
            )
        })
    }

    fn count_recipes(&self) -> Result<u64> {
        self.with_conn(|conn| count(conn, "recipes"))
    }

    // -- Recipe book --

    fn save_recipe(&self, save: &SaveRecipe) -> Result<SavedRecipe> {
        let last_made = save.last_made.map(format_date);
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO user_recipes (id, user_id, recipe_id, rating, notes, is_favorite,
                     times_cooked, last_made, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 0), COALESCE(?7, 0), ?8, ?9)
                 ON CONFLICT (user_id, recipe_id) DO UPDATE SET
                     rating = COALESCE(excluded.rating, rating),
                     notes = COALESCE(excluded.notes, notes),
                     is_favorite = COALESCE(?6, is_favorite),
                     times_cooked = COALESCE(?7, times_cooked),
                     last_made = COALESCE(excluded.last_made, last_made),
                     saved_at = excluded.saved_at",
                params![
                    Uuid::new_v4().to_string(),
                    save.user_id.to_string(),
                    save.recipe_id.to_string(),
                    save.rating,
                    save.notes,
                    save.favorite,
                    save.times_cooked,
                    last_made,
                    format_timestamp(Utc::now()),
                ],
            )?;
            query_saved(conn, save.user_id, save.recipe_id)
        })
    }

    fn rate_recipe(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        rating: u8,
        notes: Option<&str>,
    ) -> Result<SavedRecipe> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO user_recipes (id, user_id, recipe_id, rating, notes, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT (user_id, recipe_id) DO UPDATE SET
                     rating = excluded.rating,
                     notes = COALESCE(excluded.notes, notes)",
                params![
                    Uuid::new_v4().to_string(),
                    user_id.to_string(),
                    recipe_id.to_string(),
                    rating,
                    notes,
                    format_timestamp(Utc::now()),
                ],
            )?;
            query_saved(conn, user_id, recipe_id)
        })
    }

    fn user_recipes(&self, user_id: Uuid) -> Result<Vec<UserRecipe>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {}, {}
                 FROM user_recipes u
                 JOIN recipes r ON r.id = u.recipe_id
                 WHERE u.user_id = ?1
                 ORDER BY u.saved_at DESC, u.rowid DESC",
                qualified("u", SavedRecipeRow::COLUMNS),
                qualified("r", RecipeRow::COLUMNS)
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([user_id.to_string()], UserRecipeRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(UserRecipeRow::into_model).collect()
        })
    }

    fn popular_recipes(&self, limit: u32) -> Result<Vec<PopularRecipe>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {}, AVG(u.rating) AS average_rating, COUNT(u.rating)
                 FROM recipes r
                 LEFT JOIN user_recipes u ON u.recipe_id = r.id
                 WHERE r.is_public = 1
                 GROUP BY r.id
                 ORDER BY average_rating DESC NULLS LAST, r.created_at DESC, r.rowid DESC
                 LIMIT ?1",
                qualified("r", RecipeRow::COLUMNS)
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([limit], PopularRecipeRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(PopularRecipeRow::into_model).collect()
        })
    }

    // -- Suggestions --

    fn insert_suggestion(&self, suggestion: &NewSuggestion) -> Result<RecipeSuggestion> {
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
        let matched = to_json(&row.matched_ingredients)?;

        self.with_conn_mut(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "DELETE FROM recipe_suggestions
                 WHERE user_id = ?1 AND recipe_id = ?2 AND is_viewed = 0 AND is_accepted = 0",
                params![row.user_id.to_string(), row.recipe_id.to_string()],
            )?;
            tx.execute(
                "INSERT INTO recipe_suggestions (id, user_id, recipe_id, matched_ingredients,
                     score, matched_count, total_count, is_viewed, is_accepted, suggested_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0, ?8)",
                params![
                    row.id.to_string(),
                    row.user_id.to_string(),
                    row.recipe_id.to_string(),
                    matched,
                    i64::from(row.score),
                    i64::from(row.matched_count),
                    i64::from(row.total_count),
                    format_timestamp(row.suggested_at),
                ],
            )?;
            tx.commit()?;
            Ok(())
        })?;
        Ok(row)
    }

    fn unviewed_suggestions(&self, user_id: Uuid, limit: u32) -> Result<Vec<SuggestedRecipe>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {}, {}
                 FROM recipe_suggestions s
                 JOIN recipes r ON r.id = s.recipe_id
                 WHERE s.user_id = ?1 AND s.is_viewed = 0
                 ORDER BY s.score DESC, s.suggested_at DESC, s.rowid DESC
                 LIMIT ?2",
                qualified("s", SuggestionRow::COLUMNS),
                qualified("r", RecipeRow::COLUMNS)
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id.to_string(), limit], SuggestedRecipeRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(SuggestedRecipeRow::into_model).collect()
        })
    }

    fn mark_suggestion_viewed(&self, id: Uuid) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE recipe_suggestions SET is_viewed = 1 WHERE id = ?1",
                [id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    fn accept_suggestion(&self, id: Uuid) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE recipe_suggestions SET is_accepted = 1, is_viewed = 1 WHERE id = ?1",
                [id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Scans --

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
        let items = to_json(&row.recognized_items)?;

        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO scans (id, user_id, recognized_items, processing_ms, success, error, scanned_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    row.id.to_string(),
                    row.user_id.to_string(),
                    items,
                    i64::try_from(row.processing_ms).unwrap_or(i64::MAX),
                    row.success,
                    row.error,
                    format_timestamp(row.scanned_at),
                ],
            )?;
            Ok(())
        })?;
        Ok(row)
    }

    fn count_scans_since(&self, user_id: Uuid, since: DateTime<Utc>) -> Result<u64> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row(
                "SELECT COUNT(*) FROM scans WHERE user_id = ?1 AND scanned_at >= ?2",
                params![user_id.to_string(), format_timestamp(since)],
                |r| r.get(0),
            )?;
            Ok(n as u64)
        })
    }

    fn recent_scans(&self, user_id: Uuid, limit: u32) -> Result<Vec<ScanRecord>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM scans WHERE user_id = ?1
                 ORDER BY scanned_at DESC, rowid DESC
                 LIMIT ?2",
                ScanRow::COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params![user_id.to_string(), limit], ScanRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows.into_iter().map(ScanRow::into_model).collect()
        })
    }
}

fn query_saved(conn: &Connection, user_id: Uuid, recipe_id: Uuid) -> Result<SavedRecipe> {
    let sql = format!(
        "SELECT {} FROM user_recipes WHERE user_id = ?1 AND recipe_id = ?2",
        SavedRecipeRow::COLUMNS
    );
    let row = conn.query_row(
        &sql,
        params![user_id.to_string(), recipe_id.to_string()],
        SavedRecipeRow::from_row,
    )?;
    row.into_model()
}

fn count(conn: &Connection, table: &str) -> Result<u64> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))?;
    Ok(n as u64)
}

fn query_items<P: Params>(conn: &Connection, tail: &str, params: P) -> Result<Vec<InventoryItem>> {
    let sql = format!("SELECT {} FROM inventory_items {}", ItemRow::COLUMNS, tail);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, ItemRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(ItemRow::into_model).collect()
}

fn query_item(conn: &Connection, id: Uuid) -> Result<Option<InventoryItem>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM inventory_items WHERE id = ?1", ItemRow::COLUMNS),
            [id.to_string()],
            ItemRow::from_row,
        )
        .optional()?;
    row.map(ItemRow::into_model).transpose()
}

fn query_recipes<P: Params>(conn: &Connection, tail: &str, params: P) -> Result<Vec<Recipe>> {
    let sql = format!("SELECT {} FROM recipes {}", RecipeRow::COLUMNS, tail);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params, RecipeRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(RecipeRow::into_model).collect()
}

/// `%query%` with LIKE wildcards in the query escaped.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
