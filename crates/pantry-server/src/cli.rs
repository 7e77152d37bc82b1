use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use pantry_core::recipe_book::POPULAR_LIMIT;
use pantry_core::{GenerationClient, Pantry};
use pantry_db::Database;
use pantry_db::seed::{self, DEMO_USER_ID};
use pantry_types::{NewInventoryItem, SaveRecipe};

#[derive(Parser)]
#[command(name = "pantry", about = "Expiry-aware grocery inventory", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// SQLite database file (overrides PANTRY_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the demo inventory and recipes into an empty database
    Seed,

    /// Create expiry notifications for items inside the alert window
    Schedule {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,
    },

    /// Dashboard counters
    Stats {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,
    },

    /// Score the recipe catalog and save matching suggestions
    Suggest {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        /// Available ingredient; repeat for several. Defaults to the inventory.
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,

        /// Ask the generation provider for new recipes first
        #[arg(long)]
        import: bool,
    },

    /// Unviewed suggestions, best first
    Suggestions {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,
    },

    /// Mark a suggestion as accepted
    Accept {
        #[arg(long)]
        suggestion: Uuid,
    },

    /// Search the public recipe catalog
    Recipes {
        #[arg(long, default_value = "")]
        query: String,

        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },

    /// Save a recipe to a user's book, or update the saved entry
    SaveRecipe {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        recipe: Uuid,

        #[arg(long)]
        favorite: Option<bool>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long)]
        times_cooked: Option<u32>,

        /// YYYY-MM-DD
        #[arg(long)]
        last_made: Option<NaiveDate>,
    },

    /// Rate a recipe from 1 to 5
    Rate {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        recipe: Uuid,

        #[arg(long)]
        rating: u8,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Saved recipes, most recently saved first
    Saved {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,
    },

    /// Public recipes by average rating
    Popular {
        #[arg(long, default_value_t = POPULAR_LIMIT)]
        limit: u32,
    },

    /// Recognize groceries from a description and add confident matches
    Scan {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        description: String,
    },

    /// Recent scans, newest first
    Scans {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,
    },

    /// List notifications, newest first
    Notifications {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        #[arg(long)]
        notification: Uuid,
    },

    /// List or search active inventory
    Items {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        location: Option<String>,
    },

    /// Add an item and schedule its expiry notification
    AddItem {
        #[arg(long, default_value_t = DEMO_USER_ID)]
        user: Uuid,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "Other")]
        category: String,

        #[arg(long, default_value_t = 1)]
        quantity: u32,

        #[arg(long, default_value = "pieces")]
        unit: String,

        #[arg(long, default_value = "Refrigerator")]
        location: String,

        /// YYYY-MM-DD
        #[arg(long)]
        expiry: NaiveDate,
    },

    /// Mark an item as consumed
    Consume {
        #[arg(long)]
        item: Uuid,
    },

    /// Estimated nutrition per 100g (needs a generation provider)
    Nutrition {
        #[arg(long)]
        name: String,
    },
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(
    command: Command,
    db: &Database,
    pantry: &Pantry,
    generator: Option<&GenerationClient>,
) -> Result<()> {
    match command {
        Command::Seed => {
            let report = seed::ensure_seeded(db, Utc::now().date_naive())?;
            let scheduled = pantry.scheduler.schedule_now(DEMO_USER_ID).await;
            info!(
                "Seeded {} items and {} recipes, {} notifications created",
                report.items, report.recipes, scheduled.created
            );
            print(&report)
        }
        Command::Schedule { user } => print(&pantry.scheduler.schedule_now(user).await),
        Command::Stats { user } => print(&pantry.stats.compute_now(user).await),
        Command::Suggest {
            user,
            ingredients,
            import,
        } => {
            if import {
                let imported = pantry.suggestions.import_generated(&ingredients).await;
                info!("Imported {} generated recipes", imported.len());
            }
            let saved = if ingredients.is_empty() {
                pantry.suggestions.generate_from_inventory(user).await
            } else {
                pantry.suggestions.generate(user, ingredients).await
            };
            print(&saved)
        }
        Command::Suggestions { user } => print(&pantry.suggestions.list(user).await?),
        Command::Accept { suggestion } => print(&pantry.suggestions.accept(suggestion).await?),
        Command::Recipes { query, ingredients } => {
            let filter = (!ingredients.is_empty()).then_some(ingredients.as_slice());
            print(&pantry.suggestions.search(&query, filter).await?)
        }
        Command::SaveRecipe {
            user,
            recipe,
            favorite,
            notes,
            times_cooked,
            last_made,
        } => {
            let save = SaveRecipe {
                user_id: user,
                recipe_id: recipe,
                rating: None,
                notes,
                favorite,
                times_cooked,
                last_made,
            };
            print(&pantry.recipes.save(save).await?)
        }
        Command::Rate {
            user,
            recipe,
            rating,
            notes,
        } => print(&pantry.recipes.rate(user, recipe, rating, notes).await?),
        Command::Saved { user } => print(&pantry.recipes.saved(user).await?),
        Command::Popular { limit } => print(&pantry.recipes.popular(limit).await?),
        Command::Scan { user, description } => print(&pantry.scans.scan(user, &description).await?),
        Command::Scans { user } => print(&pantry.scans.history(user).await?),
        Command::Notifications { user, unread } => {
            print(&pantry.inventory.notifications(user, unread).await?)
        }
        Command::Read { notification } => {
            print(&pantry.inventory.mark_notification_read(notification).await?)
        }
        Command::Items {
            user,
            search,
            category,
            location,
        } => {
            let items = match (search, category, location) {
                (Some(q), _, _) => pantry.inventory.search_items(user, &q).await?,
                (None, Some(c), _) => pantry.inventory.items_by_category(user, &c).await?,
                (None, None, Some(l)) => pantry.inventory.items_by_location(user, &l).await?,
                (None, None, None) => pantry.inventory.list_items(user).await?,
            };
            print(&items)
        }
        Command::AddItem {
            user,
            name,
            category,
            quantity,
            unit,
            location,
            expiry,
        } => {
            let item = NewInventoryItem {
                user_id: user,
                name,
                category,
                quantity,
                unit,
                location,
                expiry_date: expiry,
                added_date: Utc::now().date_naive(),
                ai_confidence: None,
                metadata: None,
            };
            print(&pantry.inventory.add_item(item).await?)
        }
        Command::Consume { item } => print(&pantry.inventory.consume_item(item).await?),
        Command::Nutrition { name } => {
            let Some(client) = generator else {
                bail!("no generation client configured");
            };
            print(&client.analyze_nutrition(&name).await)
        }
    }
}
