use tracing::warn;

use pantry_types::{GeneratedRecipe, NutritionFacts, RecognizedItem};

use super::{GenerationClient, GenerationError, parse, prompts};

/// Generated notification copy longer than this is discarded.
pub const MAX_PHRASE_CHARS: usize = 160;

impl GenerationClient {
    /// Recognize grocery items, surfacing the failure cause.
    pub async fn try_recognize_items(
        &self,
        image_description: &str,
    ) -> Result<Vec<RecognizedItem>, GenerationError> {
        let text = self
            .generate(&prompts::recognize_items(image_description))
            .await?;
        let items: Vec<RecognizedItem> = parse::json_array(&text)?;

        Ok(items
            .into_iter()
            .filter(|item| !item.name.trim().is_empty())
            .map(|mut item| {
                item.name = item.name.trim().to_string();
                item.confidence = if item.confidence.is_finite() {
                    item.confidence.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                item
            })
            .collect())
    }

    /// Recognized items, or an empty list when generation or parsing fails.
    pub async fn recognize_items(&self, image_description: &str) -> Vec<RecognizedItem> {
        self.try_recognize_items(image_description)
            .await
            .unwrap_or_else(|e| {
                warn!("Item recognition unavailable: {}", e);
                Vec::new()
            })
    }

    pub async fn try_suggest_recipes(
        &self,
        available: &[String],
    ) -> Result<Vec<GeneratedRecipe>, GenerationError> {
        let text = self.generate(&prompts::suggest_recipes(available)).await?;
        parse::json_array(&text)
    }

    /// Generated recipes, or an empty list on failure.
    pub async fn suggest_recipes(&self, available: &[String]) -> Vec<GeneratedRecipe> {
        self.try_suggest_recipes(available).await.unwrap_or_else(|e| {
            warn!("Recipe generation unavailable: {}", e);
            Vec::new()
        })
    }

    pub async fn analyze_nutrition(&self, item_name: &str) -> Option<NutritionFacts> {
        let result = match self.generate(&prompts::nutrition(item_name)).await {
            Ok(text) => parse::json_object(&text),
            Err(e) => Err(e),
        };
        result
            .inspect_err(|e| warn!("Nutrition lookup for '{}' unavailable: {}", item_name, e))
            .ok()
    }

    /// Friendlier wording for an expiry reminder. `None` means "use the template".
    pub async fn phrase_expiry(&self, item_name: &str, days_until_expiry: i64) -> Option<String> {
        let text = self
            .generate(&prompts::expiry_notification(item_name, days_until_expiry))
            .await
            .inspect_err(|e| warn!("Notification phrasing unavailable: {}", e))
            .ok()?;

        let phrase = text.trim().trim_matches(|c| c == '"' || c == '\'').trim();
        if phrase.is_empty() || phrase.chars().count() > MAX_PHRASE_CHARS {
            warn!("Discarding generated notification text ({} chars)", phrase.chars().count());
            return None;
        }
        Some(phrase.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::genai::ProviderError;
    use crate::genai::testing::{ScriptedProvider, client_for};

    #[tokio::test]
    async fn recognizes_items_and_clamps_confidence() {
        let provider = Arc::new(ScriptedProvider::ok(
            r#"```json
            [
              {"name": " Organic Apples ", "confidence": 1.4, "category": "Fruits",
               "estimatedExpiry": "2025-03-21", "quantity": 4, "unit": "pieces"},
              {"name": "", "confidence": 0.9}
            ]
            ```"#,
        ));
        let items = client_for(provider).recognize_items("a bag of apples").await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Organic Apples");
        assert_eq!(items[0].confidence, 1.0);
    }

    #[tokio::test]
    async fn non_array_recognition_is_empty() {
        let provider = Arc::new(ScriptedProvider::ok(r#"{"name": "apple", "confidence": 0.9}"#));
        let client = client_for(provider);

        assert!(client.recognize_items("apple").await.is_empty());
        assert!(client.try_recognize_items("apple").await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_generation_yields_no_recipes() {
        let provider = Arc::new(ScriptedProvider::always(Err(ProviderError::RateLimited)));
        let recipes = client_for(provider.clone())
            .suggest_recipes(&["banana".into()])
            .await;

        assert!(recipes.is_empty());
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn nutrition_parses_object() {
        let provider = Arc::new(ScriptedProvider::ok(
            r#"{"calories": 89, "protein": 1.1, "carbs": 22.8, "fat": 0.3, "sugar": 12.2}"#,
        ));
        let facts = client_for(provider).analyze_nutrition("banana").await.unwrap();

        assert_eq!(facts.calories, 89.0);
        assert_eq!(facts.sugar, Some(12.2));
        assert_eq!(facts.fiber, None);
    }

    #[tokio::test]
    async fn phrase_strips_quotes_and_rejects_essays() {
        let quoted = Arc::new(ScriptedProvider::ok("\"Use your spinach in a salad tonight!\"\n"));
        assert_eq!(
            client_for(quoted).phrase_expiry("spinach", 1).await.as_deref(),
            Some("Use your spinach in a salad tonight!")
        );

        let essay = Arc::new(ScriptedProvider::ok(&"spinach ".repeat(40)));
        assert_eq!(client_for(essay).phrase_expiry("spinach", 1).await, None);
    }
}
