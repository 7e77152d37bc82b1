//! JSON shapes the text-generation provider is prompted to return.
//!
//! Field names are camelCase on the wire. Anything optional in the prompt is
//! optional here too: generated output is validated by the caller, not trusted.

use serde::{Deserialize, Serialize};

/// One grocery item recognized from an image description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizedItem {
    pub name: String,
    /// `0.0..=1.0`
    pub confidence: f32,
    #[serde(default = "default_category")]
    pub category: String,
    /// ISO date (`YYYY-MM-DD`) as produced by the model; may be malformed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_expiry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

fn default_category() -> String {
    "Other".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub prep_time: u32,
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default = "default_servings")]
    pub servings: u32,
    /// Kept as text; "Easy" / "Medium" / "Hard" are validated on import.
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    #[serde(default)]
    pub available_ingredients: Vec<String>,
    #[serde(default)]
    pub missing_ingredients: Vec<String>,
}

fn default_servings() -> u32 {
    1
}

/// Per-100 g nutrition facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionFacts {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
}
