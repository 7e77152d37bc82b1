use tracing::info;
use uuid::Uuid;

use pantry_types::{PopularRecipe, SaveRecipe, SavedRecipe, UserRecipe};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{SharedStore, blocking};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const POPULAR_LIMIT: u32 = 10;

/// Per-user saved recipes with ratings, notes and cooking history.
#[derive(Clone)]
pub struct RecipeBook {
    store: SharedStore,
}

fn check_rating(rating: u8) -> ServiceResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ServiceError::Invalid(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    Ok(())
}

/// Blank notes mean "no notes given".
fn given_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
}

impl RecipeBook {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    async fn require_recipe(&self, recipe_id: Uuid) -> ServiceResult<()> {
        match blocking(&self.store, move |s| s.get_recipe(recipe_id)).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                kind: "recipe",
                id: recipe_id,
            }),
        }
    }

    /// Save a recipe, or update an existing entry with the given fields.
    pub async fn save(&self, mut save: SaveRecipe) -> ServiceResult<SavedRecipe> {
        if let Some(rating) = save.rating {
            check_rating(rating)?;
        }
        save.notes = given_notes(save.notes);
        self.require_recipe(save.recipe_id).await?;

        let row = blocking(&self.store, move |s| s.save_recipe(&save)).await?;
        info!("User {} saved recipe {}", row.user_id, row.recipe_id);
        Ok(row)
    }

    /// Rate a recipe, saving it first when needed. Without notes the stored
    /// notes are kept.
    pub async fn rate(
        &self,
        user_id: Uuid,
        recipe_id: Uuid,
        rating: u8,
        notes: Option<String>,
    ) -> ServiceResult<SavedRecipe> {
        check_rating(rating)?;
        self.require_recipe(recipe_id).await?;

        let notes = given_notes(notes);
        let row = blocking(&self.store, move |s| {
            s.rate_recipe(user_id, recipe_id, rating, notes.as_deref())
        })
        .await?;
        info!("User {} rated recipe {} {}/{}", user_id, recipe_id, rating, MAX_RATING);
        Ok(row)
    }

    /// Most recently saved first.
    pub async fn saved(&self, user_id: Uuid) -> ServiceResult<Vec<UserRecipe>> {
        Ok(blocking(&self.store, move |s| s.user_recipes(user_id)).await?)
    }

    pub async fn popular(&self, limit: u32) -> ServiceResult<Vec<PopularRecipe>> {
        Ok(blocking(&self.store, move |s| s.popular_recipes(limit)).await?)
    }
}
