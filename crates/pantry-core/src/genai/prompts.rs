//! Prompt templates. Each one pins the JSON shape parsed in [`super::tasks`].

/// Upper bound requested from the model for notification copy.
pub const NOTIFICATION_CHAR_HINT: usize = 100;

pub fn recognize_items(image_description: &str) -> String {
    format!(
        r#"Identify the food items in this grocery photo description.
Description: "{image_description}"

Respond with a JSON array only, one object per item:
[
  {{
    "name": "item name",
    "confidence": 0.95,
    "category": "Fruits|Vegetables|Dairy|Meat|Bakery|Pantry|Frozen|Other",
    "estimatedExpiry": "YYYY-MM-DD",
    "quantity": 1,
    "unit": "pieces|kg|g|lbs|oz|liters|ml|containers|packages"
  }}
]

Rules:
- confidence is between 0.0 and 1.0
- estimate expiry from typical shelf life
- use the listed categories
- no prose, no Markdown"#
    )
}

pub fn suggest_recipes(available: &[String]) -> String {
    format!(
        r#"Suggest 3 to 5 recipes that use these ingredients: {}

Respond with a JSON array only:
[
  {{
    "name": "Recipe name",
    "description": "One sentence",
    "ingredients": ["2 bananas", "1 cup milk"],
    "instructions": ["step one", "step two"],
    "prepTime": 15,
    "cookTime": 30,
    "servings": 4,
    "difficulty": "Easy|Medium|Hard",
    "matchScore": 85,
    "availableIngredients": ["bananas"],
    "missingIngredients": ["milk"]
  }}
]

Rules:
- prefer recipes that use the most listed ingredients
- salt, pepper and oil count as available
- matchScore is 0-100
- no prose, no Markdown"#,
        available.join(", ")
    )
}

pub fn nutrition(item_name: &str) -> String {
    format!(
        r#"Give nutrition facts per 100 g for: {item_name}

Respond with a JSON object only:
{{"calories": 100, "protein": 5, "carbs": 20, "fat": 2, "fiber": 3, "sugar": 15, "sodium": 50}}"#
    )
}

pub fn expiry_notification(item_name: &str, days_until_expiry: i64) -> String {
    let timeframe = match days_until_expiry {
        d if d < 0 => format!("expired {} day(s) ago", -d),
        0 => "expires today".to_string(),
        d => format!("expires in {} day(s)", d),
    };
    format!(
        r#"Write a short, friendly reminder for a grocery item.
Item: {item_name}
Status: {timeframe}

Mention the item and the timeframe, suggest what to do with it, and stay under {NOTIFICATION_CHAR_HINT} characters.
Reply with the message text only, no quotes."#
    )
}
