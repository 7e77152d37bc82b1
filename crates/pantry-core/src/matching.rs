//! Free-text ingredient matching.
//!
//! Ingredient lines are natural language ("2 ripe bananas", "1 cup spinach"),
//! so matching is a case-insensitive substring test in either direction
//! rather than token equality.

use pantry_types::Recipe;

/// Minimum score for a recipe to be suggested.
pub const ACCEPTANCE_THRESHOLD: u8 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientMatch {
    /// Recipe ingredient lines that matched, in recipe order.
    pub matched: Vec<String>,
    pub score: u8,
    pub matched_count: u32,
    pub total_count: u32,
}

impl IngredientMatch {
    pub fn is_eligible(&self) -> bool {
        self.matched_count > 0 && self.score >= ACCEPTANCE_THRESHOLD
    }
}

/// Lowercased, trimmed available ingredients; blanks dropped because an
/// empty string is a substring of everything.
fn normalize<A: AsRef<str>>(available: &[A]) -> Vec<String> {
    available
        .iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

fn related_normalized(ingredient: &str, available: &str) -> bool {
    ingredient.contains(available) || available.contains(ingredient)
}

/// Whether two ingredient strings refer to each other.
pub fn ingredients_related(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    !a.is_empty() && !b.is_empty() && related_normalized(&a, &b)
}

/// Score a recipe's ingredients against what is on hand.
///
/// `None` for a recipe with no ingredients: it cannot be scored.
pub fn score<R: AsRef<str>, A: AsRef<str>>(
    recipe_ingredients: &[R],
    available: &[A],
) -> Option<IngredientMatch> {
    if recipe_ingredients.is_empty() {
        return None;
    }
    let available = normalize(available);

    let matched: Vec<String> = recipe_ingredients
        .iter()
        .map(AsRef::as_ref)
        .filter(|ingredient| {
            let ingredient = ingredient.trim().to_lowercase();
            !ingredient.is_empty()
                && available
                    .iter()
                    .any(|have| related_normalized(&ingredient, have))
        })
        .map(str::to_string)
        .collect();

    let total = recipe_ingredients.len() as u32;
    let hits = matched.len() as u32;
    Some(IngredientMatch {
        matched,
        score: rounded_percent(hits, total),
        matched_count: hits,
        total_count: total,
    })
}

/// `round(100 * part / whole)` with halves rounding up. `part <= whole`.
fn rounded_percent(part: u32, whole: u32) -> u8 {
    let (part, whole) = (u64::from(part), u64::from(whole));
    ((200 * part + whole) / (2 * whole)) as u8
}

#[derive(Debug, Clone)]
pub struct RankedRecipe<'a> {
    pub recipe: &'a Recipe,
    pub matching: IngredientMatch,
}

/// Eligible recipes, best score first. Equal scores keep catalog order.
pub fn rank<'a, A: AsRef<str>>(recipes: &'a [Recipe], available: &[A]) -> Vec<RankedRecipe<'a>> {
    let mut ranked: Vec<RankedRecipe<'a>> = recipes
        .iter()
        .filter_map(|recipe| {
            let matching = score(&recipe.ingredients, available)?;
            matching
                .is_eligible()
                .then_some(RankedRecipe { recipe, matching })
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.matching.score.cmp(&a.matching.score));
    ranked
}

/// True when some recipe ingredient line contains an available ingredient.
///
/// Narrower than scoring: only the recipe line is searched, so "granola
/// bars" on hand does not select a recipe that calls for "granola".
pub fn shares_ingredient<A: AsRef<str>>(recipe: &Recipe, available: &[A]) -> bool {
    let available = normalize(available);
    recipe.ingredients.iter().any(|ingredient| {
        let ingredient = ingredient.to_lowercase();
        available.iter().any(|have| ingredient.contains(have.as_str()))
    })
}
