use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPreference {
    pub id: Uuid,
    pub household_id: Uuid,
    pub meal_type: String,
    pub meal_description: String,
    pub preference: String,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

pub async fn list_for_household(
    db: &PgPool,
    household_id: Uuid,
) -> anyhow::Result<Vec<MealPreference>> {
    let rows = sqlx::query_as::<_, MealPreference>(
        r#"
        SELECT id, household_id, meal_type, meal_description, preference, created_by, created_at
        FROM meal_preferences
        WHERE household_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(household_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find_by_triple(
    db: &PgPool,
    household_id: Uuid,
    meal_type: &str,
    meal_description: &str,
) -> anyhow::Result<Option<MealPreference>> {
    let row = sqlx::query_as::<_, MealPreference>(
        r#"
        SELECT id, household_id, meal_type, meal_description, preference, created_by, created_at
        FROM meal_preferences
        WHERE household_id = $1 AND meal_type = $2 AND meal_description = $3
        "#,
    )
    .bind(household_id)
    .bind(meal_type)
    .bind(meal_description)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Upsert keyed by (household, meal type, description): a meal is never
/// simultaneously liked and disliked, and re-recording the opposite
/// preference flips the existing row.
pub async fn upsert(
    db: &PgPool,
    household_id: Uuid,
    meal_type: &str,
    meal_description: &str,
    preference: &str,
    created_by: Uuid,
) -> anyhow::Result<MealPreference> {
    let row = sqlx::query_as::<_, MealPreference>(
        r#"
        INSERT INTO meal_preferences (household_id, meal_type, meal_description, preference, created_by)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (household_id, meal_type, meal_description) DO UPDATE SET
            preference = EXCLUDED.preference,
            created_by = EXCLUDED.created_by
        RETURNING id, household_id, meal_type, meal_description, preference, created_by, created_at
        "#,
    )
    .bind(household_id)
    .bind(meal_type)
    .bind(meal_description)
    .bind(preference)
    .bind(created_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM meal_preferences WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<MealPreference>> {
    let row = sqlx::query_as::<_, MealPreference>(
        r#"
        SELECT id, household_id, meal_type, meal_description, preference, created_by, created_at
        FROM meal_preferences
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
