//! Demo data for an empty database.

use anyhow::Result;
use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use pantry_core::store::PantryStore;
use pantry_types::{Difficulty, NewInventoryItem, NewRecipe, Nutrition, RecipeSource};

use crate::Database;

/// Owner of the demo inventory.
pub const DEMO_USER_ID: Uuid = Uuid::from_u128(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub items: usize,
    pub recipes: usize,
}

/// Insert the demo inventory and recipe catalog. Each table is only seeded
/// while it is empty, so this is safe to call on every start.
pub fn ensure_seeded(db: &Database, today: NaiveDate) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if db.count_items()? == 0 {
        for item in demo_items(today) {
            db.insert_item(&item)?;
            report.items += 1;
        }
        info!("Seeded {} demo inventory items", report.items);
    }

    if db.count_recipes()? == 0 {
        for recipe in demo_recipes() {
            db.insert_recipe(&recipe)?;
            report.recipes += 1;
        }
        info!("Seeded {} demo recipes", report.recipes);
    }

    Ok(report)
}

// name, category, days until expiry, quantity, unit, location, confidence
const DEMO_ITEMS: [(&str, &str, i64, u32, &str, &str, f32); 4] = [
    ("Organic Bananas", "Fruits", 2, 6, "pieces", "Counter", 0.95),
    ("Fresh Spinach", "Vegetables", 1, 1, "bunch", "Refrigerator", 0.92),
    ("Greek Yogurt", "Dairy", 7, 2, "containers", "Refrigerator", 0.98),
    ("Whole Grain Bread", "Bakery", 4, 1, "loaf", "Pantry", 0.89),
];

pub fn demo_items(today: NaiveDate) -> Vec<NewInventoryItem> {
    DEMO_ITEMS
        .iter()
        .map(
            |&(name, category, days_left, quantity, unit, location, confidence)| NewInventoryItem {
                user_id: DEMO_USER_ID,
                name: name.to_string(),
                category: category.to_string(),
                quantity,
                unit: unit.to_string(),
                location: location.to_string(),
                expiry_date: today + TimeDelta::days(days_left),
                added_date: today,
                ai_confidence: Some(confidence),
                metadata: None,
            },
        )
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn nutrition(calories: f64, protein: f64, carbs: f64, fat: f64) -> Option<Nutrition> {
    Some(Nutrition {
        calories: Some(calories),
        protein: Some(protein),
        carbs: Some(carbs),
        fat: Some(fat),
    })
}

pub fn demo_recipes() -> Vec<NewRecipe> {
    vec![
        NewRecipe {
            name: "Banana Spinach Smoothie".into(),
            description: Some("A healthy and delicious smoothie perfect for breakfast".into()),
            ingredients: strings(&[
                "2 bananas",
                "1 cup fresh spinach",
                "1 cup Greek yogurt",
                "2 tbsp honey",
                "1 cup almond milk",
            ]),
            instructions: strings(&[
                "Add spinach and almond milk to blender",
                "Add bananas and Greek yogurt",
                "Blend until smooth",
                "Add honey to taste",
                "Serve immediately",
            ]),
            prep_minutes: 5,
            cook_minutes: 0,
            servings: 2,
            difficulty: Difficulty::Easy,
            cuisine: Some("American".into()),
            tags: strings(&["healthy", "breakfast", "smoothie", "vegetarian"]),
            nutrition: nutrition(180.0, 12.0, 35.0, 3.0),
            source: RecipeSource::Seed,
            public: true,
        },
        NewRecipe {
            name: "Spinach and Yogurt Parfait".into(),
            description: Some("A nutritious layered parfait with fresh ingredients".into()),
            ingredients: strings(&[
                "1 cup Greek yogurt",
                "1 cup fresh spinach",
                "1/2 cup granola",
                "1/2 cup mixed berries",
                "2 tbsp honey",
            ]),
            instructions: strings(&[
                "Layer yogurt in glass",
                "Add fresh spinach leaves",
                "Sprinkle granola",
                "Top with berries",
                "Drizzle with honey",
            ]),
            prep_minutes: 10,
            cook_minutes: 0,
            servings: 1,
            difficulty: Difficulty::Easy,
            cuisine: Some("Mediterranean".into()),
            tags: strings(&["healthy", "breakfast", "parfait", "vegetarian"]),
            nutrition: nutrition(220.0, 15.0, 30.0, 6.0),
            source: RecipeSource::Seed,
            public: true,
        },
        NewRecipe {
            name: "Quick Banana Bread".into(),
            description: Some("Easy banana bread using ripe bananas".into()),
            ingredients: strings(&[
                "3 ripe bananas",
                "1/3 cup melted butter",
                "3/4 cup sugar",
                "1 egg",
                "1 tsp vanilla",
                "1 tsp baking soda",
                "1 1/2 cups flour",
            ]),
            instructions: strings(&[
                "Preheat oven to 350°F",
                "Mash bananas in large bowl",
                "Mix in melted butter",
                "Add sugar, egg, and vanilla",
                "Mix in baking soda and flour",
                "Pour into greased loaf pan",
                "Bake for 60 minutes",
            ]),
            prep_minutes: 15,
            cook_minutes: 60,
            servings: 8,
            difficulty: Difficulty::Medium,
            cuisine: Some("American".into()),
            tags: strings(&["baking", "dessert", "banana", "bread"]),
            nutrition: nutrition(280.0, 4.0, 58.0, 6.0),
            source: RecipeSource::Seed,
            public: true,
        },
    ]
}
