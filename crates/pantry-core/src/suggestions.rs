use tracing::{debug, error, info, warn};
use uuid::Uuid;

use pantry_types::{
    Difficulty, GeneratedRecipe, NewRecipe, NewSuggestion, Recipe, RecipeSource, RecipeSuggestion,
    SuggestedRecipe,
};

use crate::error::ServiceResult;
use crate::genai::GenerationClient;
use crate::matching;
use crate::store::{SharedStore, blocking};

/// Recipes scored per generation pass.
pub const CATALOG_LIMIT: u32 = 50;
/// Unviewed suggestions returned by [`SuggestionEngine::list`].
pub const LIST_LIMIT: u32 = 10;
pub const SEARCH_LIMIT: u32 = 20;
/// Inventory items used as the available set.
const INVENTORY_LIMIT: u32 = 50;

#[derive(Clone)]
pub struct SuggestionEngine {
    store: SharedStore,
    generator: Option<GenerationClient>,
}

impl SuggestionEngine {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            generator: None,
        }
    }

    pub fn with_generator(mut self, client: GenerationClient) -> Self {
        self.generator = Some(client);
        self
    }

    /// Score the public catalog against `available` and persist one
    /// suggestion per eligible recipe, best first.
    ///
    /// A store failure while loading the catalog yields an empty list. A
    /// failed insert drops that one suggestion.
    pub async fn generate(&self, user_id: Uuid, available: Vec<String>) -> Vec<RecipeSuggestion> {
        let catalog = match blocking(&self.store, |s| s.public_recipes(CATALOG_LIMIT)).await {
            Ok(catalog) => catalog,
            Err(e) => {
                error!("Failed to load recipe catalog: {}", e);
                return Vec::new();
            }
        };

        let ranked = matching::rank(&catalog, &available);
        debug!(
            "{} of {} recipes eligible for user {}",
            ranked.len(),
            catalog.len(),
            user_id
        );

        let mut saved = Vec::with_capacity(ranked.len());
        for candidate in ranked {
            let new = NewSuggestion {
                user_id,
                recipe_id: candidate.recipe.id,
                matched_ingredients: candidate.matching.matched,
                score: candidate.matching.score,
                matched_count: candidate.matching.matched_count,
                total_count: candidate.matching.total_count,
            };
            let recipe_id = new.recipe_id;
            match blocking(&self.store, move |s| s.insert_suggestion(&new)).await {
                Ok(row) => saved.push(row),
                Err(e) => warn!("Failed to save suggestion for recipe {}: {}", recipe_id, e),
            }
        }

        info!("Generated {} suggestions for user {}", saved.len(), user_id);
        saved
    }

    /// [`generate`](Self::generate) with the names of the user's
    /// non-consumed items as the available set.
    pub async fn generate_from_inventory(&self, user_id: Uuid) -> Vec<RecipeSuggestion> {
        let items = blocking(&self.store, move |s| s.active_items(user_id, INVENTORY_LIMIT)).await;
        let items = match items {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to load inventory for user {}: {}", user_id, e);
                return Vec::new();
            }
        };
        let available = items.into_iter().map(|i| i.name).collect();
        self.generate(user_id, available).await
    }

    pub async fn list(&self, user_id: Uuid) -> ServiceResult<Vec<SuggestedRecipe>> {
        Ok(blocking(&self.store, move |s| s.unviewed_suggestions(user_id, LIST_LIMIT)).await?)
    }

    pub async fn mark_viewed(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(blocking(&self.store, move |s| s.mark_suggestion_viewed(id)).await?)
    }

    pub async fn accept(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(blocking(&self.store, move |s| s.accept_suggestion(id)).await?)
    }

    /// Public recipes matching `query`, optionally narrowed to those with an
    /// ingredient line containing one of `available`.
    pub async fn search(
        &self,
        query: &str,
        available: Option<&[String]>,
    ) -> ServiceResult<Vec<Recipe>> {
        let query = query.trim().to_string();
        let recipes = blocking(&self.store, move |s| s.search_recipes(&query, SEARCH_LIMIT)).await?;
        Ok(match available {
            Some(available) if !available.is_empty() => recipes
                .into_iter()
                .filter(|r| matching::shares_ingredient(r, available))
                .collect(),
            _ => recipes,
        })
    }

    /// Ask the generation client for recipes and add the valid ones to the
    /// catalog. Without a client this is a no-op.
    pub async fn import_generated(&self, available: &[String]) -> Vec<Recipe> {
        let Some(client) = &self.generator else {
            debug!("No generation client configured; skipping recipe import");
            return Vec::new();
        };

        let generated = client.suggest_recipes(available).await;
        let total = generated.len();
        let mut imported = Vec::new();
        for recipe in generated.into_iter().filter_map(validate_generated) {
            let name = recipe.name.clone();
            match blocking(&self.store, move |s| s.insert_recipe(&recipe)).await {
                Ok(row) => imported.push(row),
                Err(e) => warn!("Failed to import generated recipe '{}': {}", name, e),
            }
        }

        info!("Imported {} of {} generated recipes", imported.len(), total);
        imported
    }
}

/// Convert a generated recipe into a catalog entry. Rejects entries with no
/// name, no usable ingredients or an unknown difficulty.
pub fn validate_generated(recipe: GeneratedRecipe) -> Option<NewRecipe> {
    let name = recipe.name.trim();
    if name.is_empty() {
        return None;
    }
    let ingredients: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|i| i.trim())
        .filter(|i| !i.is_empty())
        .map(str::to_string)
        .collect();
    if ingredients.is_empty() {
        debug!("Rejecting generated recipe '{}': no ingredients", name);
        return None;
    }
    let difficulty: Difficulty = match recipe.difficulty.parse() {
        Ok(d) => d,
        Err(e) => {
            debug!("Rejecting generated recipe '{}': {}", name, e);
            return None;
        }
    };
    let description = recipe.description.trim();

    Some(NewRecipe {
        name: name.to_string(),
        description: (!description.is_empty()).then(|| description.to_string()),
        ingredients,
        instructions: recipe.instructions,
        prep_minutes: recipe.prep_time,
        cook_minutes: recipe.cook_time,
        servings: recipe.servings.max(1),
        difficulty,
        cuisine: None,
        tags: vec!["ai-generated".to_string()],
        nutrition: None,
        source: RecipeSource::AiGenerated,
        public: true,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use super::*;
    use crate::genai::testing::{ScriptedProvider, client_for};
    use crate::memory::{MemoryStore, new_item};
    use crate::store::PantryStore;

    fn new_recipe(name: &str, ingredients: &[&str]) -> NewRecipe {
        NewRecipe {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec!["Combine".to_string()],
            prep_minutes: 5,
            cook_minutes: 0,
            servings: 1,
            difficulty: Difficulty::Easy,
            cuisine: None,
            tags: vec![],
            nutrition: None,
            source: RecipeSource::Seed,
            public: true,
        }
    }

    fn seeded() -> (Arc<MemoryStore>, SuggestionEngine) {
        let store = Arc::new(MemoryStore::new());
        let catalog = [
            new_recipe(
                "Banana Spinach Smoothie",
                &["2 bananas", "1 cup spinach", "1 cup milk", "1 tbsp honey"],
            ),
            new_recipe(
                "Spinach and Yogurt Parfait",
                &["1 cup Greek yogurt", "1/2 cup spinach", "granola"],
            ),
            new_recipe(
                "Quick Banana Bread",
                &["3 ripe bananas", "2 cups flour", "1 egg", "1/2 cup sugar", "butter"],
            ),
        ];
        for recipe in &catalog {
            store.insert_recipe(recipe).unwrap();
        }
        store.insert_recipe(&new_recipe("Nothing", &[])).unwrap();
        let engine = SuggestionEngine::new(store.clone());
        (store, engine)
    }

    fn names(list: &[SuggestedRecipe]) -> Vec<&str> {
        list.iter().map(|s| s.recipe.name.as_str()).collect()
    }

    #[tokio::test]
    async fn generate_persists_eligible_in_rank_order() {
        let (store, engine) = seeded();
        let user = Uuid::new_v4();

        let saved = engine
            .generate(user, vec!["banana".into(), "spinach".into(), "Greek yogurt".into()])
            .await;

        // Parfait 67, Smoothie 50; Banana Bread 20 is below threshold
        let scores: Vec<u8> = saved.iter().map(|s| s.score).collect();
        assert_eq!(scores, vec![67, 50]);
        assert_eq!(store.all_suggestions().len(), 2);
        assert!(saved.iter().all(|s| s.user_id == user && !s.viewed));
    }

    #[tokio::test]
    async fn regenerating_replaces_unviewed_rows() {
        let (store, engine) = seeded();
        let user = Uuid::new_v4();
        let available = vec!["banana".to_string(), "spinach".to_string()];

        engine.generate(user, available.clone()).await;
        engine.generate(user, available).await;

        assert_eq!(store.all_suggestions().len(), 2);
    }

    #[tokio::test]
    async fn failed_insert_skips_only_that_row() {
        let (store, engine) = seeded();
        let parfait = store.search_recipes("parfait", 1).unwrap().remove(0);
        store.fail_suggestions_for(parfait.id);

        let saved = engine
            .generate(Uuid::new_v4(), vec!["banana".into(), "spinach".into(), "yogurt".into()])
            .await;

        assert_eq!(saved.len(), 1);
        assert_ne!(saved[0].recipe_id, parfait.id);
    }

    #[tokio::test]
    async fn generate_from_inventory_uses_item_names() {
        let (store, engine) = seeded();
        let user = Uuid::new_v4();
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();
        store.insert_item(&new_item(user, "Bananas", expiry)).unwrap();
        store.insert_item(&new_item(user, "Milk", expiry)).unwrap();
        let eaten = store.insert_item(&new_item(user, "Spinach", expiry)).unwrap();
        store.consume_item(eaten.id).unwrap();

        let saved = engine.generate_from_inventory(user).await;

        // Smoothie: bananas + milk = 2 of 4
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].score, 50);
        assert_eq!(saved[0].matched_ingredients, vec!["2 bananas", "1 cup milk"]);
    }

    #[tokio::test]
    async fn list_hides_viewed_and_accepted() {
        let (_store, engine) = seeded();
        let user = Uuid::new_v4();
        let saved = engine
            .generate(user, vec!["banana".into(), "spinach".into(), "yogurt".into()])
            .await;

        let listed = engine.list(user).await.unwrap();
        assert_eq!(names(&listed), vec!["Spinach and Yogurt Parfait", "Banana Spinach Smoothie"]);

        assert!(engine.accept(saved[0].id).await.unwrap());
        assert!(engine.mark_viewed(saved[1].id).await.unwrap());
        assert!(engine.list(user).await.unwrap().is_empty());
        assert!(!engine.accept(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn search_filters_by_shared_ingredient() {
        let (_store, engine) = seeded();

        let all = engine.search("banana", None).await.unwrap();
        assert_eq!(all.len(), 2);

        let with_yogurt = engine
            .search("spinach", Some(&["greek yogurt".to_string()]))
            .await
            .unwrap();
        assert_eq!(with_yogurt.len(), 1);
        assert_eq!(with_yogurt[0].name, "Spinach and Yogurt Parfait");

        // the recipe line must contain what is on hand, not the reverse
        let longer = engine
            .search("smoothie", Some(&["fresh baby spinach".to_string()]))
            .await
            .unwrap();
        assert!(longer.is_empty());
        let shorter = engine
            .search("smoothie", Some(&["spinach".to_string()]))
            .await
            .unwrap();
        assert_eq!(shorter.len(), 1);
    }

    #[tokio::test]
    async fn import_generated_stores_valid_recipes() {
        let store = Arc::new(MemoryStore::new());
        let provider = Arc::new(ScriptedProvider::ok(
            r#"[
              {"name": "Banana Oat Cookies", "description": "Two-ingredient cookies",
               "ingredients": ["2 bananas", "1 cup oats"], "instructions": ["Mash", "Bake"],
               "prepTime": 10, "cookTime": 15, "servings": 12, "difficulty": "Easy"},
              {"name": "Mystery", "ingredients": [], "difficulty": "easy"},
              {"name": "Souffle", "ingredients": ["eggs"], "difficulty": "Legendary"}
            ]"#,
        ));
        let engine = SuggestionEngine::new(store.clone()).with_generator(client_for(provider));

        let imported = engine.import_generated(&["banana".to_string()]).await;

        assert_eq!(imported.len(), 1);
        let recipe = &imported[0];
        assert_eq!(recipe.name, "Banana Oat Cookies");
        assert_eq!(recipe.source, RecipeSource::AiGenerated);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(store.public_recipes(10).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn import_without_generator_is_noop() {
        let (_store, engine) = seeded();
        assert!(engine.import_generated(&["banana".to_string()]).await.is_empty());
    }
}
