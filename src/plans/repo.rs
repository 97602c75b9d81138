use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::MealPlanDocument;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MealPlanRow {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub family_size: i32,
    pub weekly_budget: f64,
    pub household_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    /// Nullable for legacy rows saved before plans were keyed by week.
    pub week_start_date: Option<Date>,
    pub plan: Json<MealPlanDocument>,
}

/// At most one row exists per (household, week); absence is a miss, not an
/// error.
pub async fn get_for_week(
    db: &PgPool,
    household_id: Uuid,
    week_start: Date,
) -> anyhow::Result<Option<MealPlanRow>> {
    let row = sqlx::query_as::<_, MealPlanRow>(
        r#"
        SELECT id, created_at, family_size, weekly_budget, household_id, created_by,
               week_start_date, plan
        FROM meal_plans
        WHERE household_id = $1 AND week_start_date = $2
        "#,
    )
    .bind(household_id)
    .bind(week_start)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Upsert on (household_id, week_start_date): saving over an already-planned
/// week replaces plan, family size and budget wholesale.
pub async fn save_for_week(
    db: &PgPool,
    document: &MealPlanDocument,
    household_id: Uuid,
    user_id: Uuid,
    week_start: Date,
) -> anyhow::Result<MealPlanRow> {
    let row = sqlx::query_as::<_, MealPlanRow>(
        r#"
        INSERT INTO meal_plans (family_size, weekly_budget, household_id, created_by, week_start_date, plan)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (household_id, week_start_date) DO UPDATE SET
            family_size = EXCLUDED.family_size,
            weekly_budget = EXCLUDED.weekly_budget,
            created_by = EXCLUDED.created_by,
            plan = EXCLUDED.plan
        RETURNING id, created_at, family_size, weekly_budget, household_id, created_by,
                  week_start_date, plan
        "#,
    )
    .bind(document.family_size)
    .bind(document.weekly_budget)
    .bind(household_id)
    .bind(user_id)
    .bind(week_start)
    .bind(Json(document))
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn history(db: &PgPool, household_id: Uuid) -> anyhow::Result<Vec<MealPlanRow>> {
    let rows = sqlx::query_as::<_, MealPlanRow>(
        r#"
        SELECT id, created_at, family_size, weekly_budget, household_id, created_by,
               week_start_date, plan
        FROM meal_plans
        WHERE household_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(household_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<MealPlanRow>> {
    let row = sqlx::query_as::<_, MealPlanRow>(
        r#"
        SELECT id, created_at, family_size, weekly_budget, household_id, created_by,
               week_start_date, plan
        FROM meal_plans
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM meal_plans WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
