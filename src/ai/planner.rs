use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::ai::parse_generated;
use crate::auth::jwt::AuthUser;
use crate::error::AppError;
use crate::households;
use crate::plans::dto::{validate_document, MealPlanDocument};
use crate::plans::{self, repo::MealPlanRow};
use crate::preferences;
use crate::state::AppState;
use crate::week;

const PLAN_MAX_TOKENS: u32 = 4096;

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub week_start_date: Option<String>,
    pub dietary_notes: Option<String>,
}

/// Assembles the generation instruction: family envelope, dietary notes
/// verbatim, liked meals to imitate, disliked meals to avoid, and the exact
/// output schema (7 days Monday through Sunday, groceries grouped by store).
pub fn build_plan_prompt(
    family_size: i32,
    weekly_budget: f64,
    dietary_notes: Option<&str>,
    liked_meals: &[String],
    disliked_meals: &[String],
) -> String {
    let mut preferences_section = String::new();
    if !liked_meals.is_empty() {
        preferences_section.push_str("\nMeals the family has LIKED (include similar meals):\n");
        for meal in liked_meals {
            preferences_section.push_str(&format!("- {meal}\n"));
        }
    }
    if !disliked_meals.is_empty() {
        preferences_section.push_str("\nMeals the family has DISLIKED (AVOID these completely):\n");
        for meal in disliked_meals {
            preferences_section.push_str(&format!("- {meal}\n"));
        }
    }

    let dietary_line = dietary_notes
        .filter(|notes| !notes.trim().is_empty())
        .map(|notes| format!("Dietary considerations: {notes}"))
        .unwrap_or_default();

    format!(
        r#"You are a helpful meal planning assistant. Generate a weekly meal plan for a family of {family_size} with a budget of ${weekly_budget} per week.

{dietary_line}
{preferences_section}
Return ONLY valid JSON matching this exact structure (no markdown, no explanation):
{{
  "familySize": {family_size},
  "weeklyBudget": {weekly_budget},
  "estimatedWeeklyTotal": "$XXX",
  "days": [
    {{
      "day": "Monday",
      "breakfast": "description",
      "lunch": "description",
      "dinner": "description",
      "dinnerCost": "$XX"
    }}
  ],
  "groceries": {{
    "Store Name (~$XXX)": [
      {{ "item": "Item name (quantity)", "price": "$XX" }}
    ]
  }}
}}

Include all 7 days (Monday through Sunday). Organize groceries by store (suggest bulk stores like Sam's Club or Costco for larger items, and regular grocery stores for fresh items). Make meals practical, family-friendly, and budget-conscious. Ensure the estimated total stays within or close to the budget."#
    )
}

/// POST /households/:id/plans/generate
///
/// Generates a plan from the household envelope plus its recorded likes and
/// dislikes, then persists it for the selected week (defaults to the current
/// week) before returning. Single attempt; callers retry manually.
#[instrument(skip(state, body))]
pub async fn generate_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(household_id): Path<Uuid>,
    Json(body): Json<GeneratePlanRequest>,
) -> Result<Json<MealPlanRow>, AppError> {
    households::repo::require_member(&state.db, household_id, user_id).await?;

    let household = households::repo::find(&state.db, household_id)
        .await?
        .ok_or_else(|| AppError::not_found("Household not found"))?;

    let week_start = match body.week_start_date.as_deref() {
        Some(key) => week::week_start(week::parse_week_key(key)?),
        None => week::week_start(OffsetDateTime::now_utc().date()),
    };

    let prefs = preferences::repo::list_for_household(&state.db, household_id).await?;
    let liked: Vec<String> = prefs
        .iter()
        .filter(|p| p.preference == "liked")
        .map(|p| p.meal_description.clone())
        .collect();
    let disliked: Vec<String> = prefs
        .iter()
        .filter(|p| p.preference == "disliked")
        .map(|p| p.meal_description.clone())
        .collect();

    let prompt = build_plan_prompt(
        household.family_size,
        household.weekly_budget,
        body.dietary_notes.as_deref(),
        &liked,
        &disliked,
    );

    let raw = state.generator.generate(&prompt, PLAN_MAX_TOKENS).await?;
    let document: MealPlanDocument = parse_generated(&raw)?;
    validate_document(&document).map_err(AppError::Generation)?;

    let saved =
        plans::repo::save_for_week(&state.db, &document, household_id, user_id, week_start).await?;

    info!(
        household_id = %household_id,
        week = %week::week_key(week_start),
        "meal plan generated and saved"
    );
    Ok(Json(saved))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_states_family_size_and_budget() {
        let prompt = build_plan_prompt(4, 300.0, None, &[], &[]);
        assert!(prompt.contains("family of 4"));
        assert!(prompt.contains("budget of $300"));
        assert!(prompt.contains("Monday through Sunday"));
    }

    #[test]
    fn prompt_includes_dietary_notes_verbatim() {
        let prompt = build_plan_prompt(2, 150.0, Some("vegetarian, no peanuts"), &[], &[]);
        assert!(prompt.contains("Dietary considerations: vegetarian, no peanuts"));
    }

    #[test]
    fn prompt_omits_empty_sections() {
        let prompt = build_plan_prompt(2, 150.0, None, &[], &[]);
        assert!(!prompt.contains("Dietary considerations"));
        assert!(!prompt.contains("LIKED"));
        assert!(!prompt.contains("DISLIKED"));
    }

    #[test]
    fn generated_document_parses_and_validates() {
        let doc = crate::plans::dto::sample_document();
        let raw = format!(
            "```json\n{}\n```",
            serde_json::to_string(&doc).expect("serializes")
        );
        let parsed: MealPlanDocument = parse_generated(&raw).expect("parses");
        validate_document(&parsed).expect("valid");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn prompt_lists_liked_and_disliked_meals() {
        let liked = vec!["Veggie Stir Fry".to_string()];
        let disliked = vec!["Liver".to_string()];
        let prompt = build_plan_prompt(4, 300.0, Some("vegetarian"), &liked, &disliked);
        assert!(prompt.contains("LIKED (include similar meals):\n- Veggie Stir Fry"));
        assert!(prompt.contains("DISLIKED (AVOID these completely):\n- Liver"));
    }
}
