use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::ai::parse_generated;
use crate::auth::jwt::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

const RECIPE_MAX_TOKENS: u32 = 2048;
const DEFAULT_SERVINGS: i32 = 4;

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub meal_name: String,
    pub servings: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub name: String,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: i32,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tips: Option<String>,
}

pub fn build_recipe_prompt(meal_name: &str, servings: i32) -> String {
    format!(
        r#"You are a helpful cooking assistant. Generate a detailed recipe for "{meal_name}" that serves {servings} people.

Return ONLY valid JSON matching this exact structure (no markdown, no explanation):
{{
  "name": "{meal_name}",
  "prepTime": "XX minutes",
  "cookTime": "XX minutes",
  "servings": {servings},
  "ingredients": [
    "1 cup ingredient",
    "2 tbsp ingredient"
  ],
  "instructions": [
    "Step 1 description",
    "Step 2 description"
  ],
  "tips": "Optional helpful tips for this recipe"
}}

Make the recipe practical and family-friendly. Include specific measurements and clear instructions. Keep ingredient list reasonable (under 15 items if possible)."#
    )
}

/// POST /recipes — structured recipe for one meal. Fails fast on an empty
/// meal name before any external call; otherwise one attempt, no retry.
#[instrument(skip(state, body))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<Recipe>, AppError> {
    let meal_name = body.meal_name.trim();
    if meal_name.is_empty() {
        return Err(AppError::validation("meal_name is required"));
    }
    let servings = body.servings.unwrap_or(DEFAULT_SERVINGS).max(1);

    let prompt = build_recipe_prompt(meal_name, servings);
    let raw = state.generator.generate(&prompt, RECIPE_MAX_TOKENS).await?;
    let recipe: Recipe = parse_generated(&raw)?;
    Ok(Json(recipe))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_meal_and_servings() {
        let prompt = build_recipe_prompt("Veggie Stir Fry", 6);
        assert!(prompt.contains("\"Veggie Stir Fry\""));
        assert!(prompt.contains("serves 6 people"));
        assert!(prompt.contains("\"servings\": 6"));
    }

    #[test]
    fn recipe_parses_from_fenced_output() {
        let raw = r#"```json
{
  "name": "Veggie Stir Fry",
  "prepTime": "15 minutes",
  "cookTime": "10 minutes",
  "servings": 4,
  "ingredients": ["2 cups broccoli", "1 tbsp soy sauce"],
  "instructions": ["Chop vegetables", "Stir fry over high heat"],
  "tips": "Prep everything before heating the wok"
}
```"#;
        let recipe: Recipe = parse_generated(raw).expect("parses");
        assert_eq!(recipe.name, "Veggie Stir Fry");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.tips.as_deref(), Some("Prep everything before heating the wok"));
    }

    #[test]
    fn recipe_tips_are_optional() {
        let raw = r#"{"name":"Toast","prepTime":"2 minutes","cookTime":"3 minutes","servings":1,"ingredients":["bread"],"instructions":["toast it"]}"#;
        let recipe: Recipe = parse_generated(raw).expect("parses");
        assert!(recipe.tips.is_none());
    }

    #[test]
    fn recipe_missing_fields_fail_parse() {
        let raw = r#"{"name":"Toast"}"#;
        let err = parse_generated::<Recipe>(raw).unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
