use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    /// Selects which household's data a session shows; NULL until
    /// onboarding completes.
    pub active_household_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, display_name, avatar_url, active_household_id, created_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Best-effort creation for users whose profile row never materialized;
/// existing rows are left untouched.
pub async fn ensure_exists(db: &PgPool, id: Uuid, display_name: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, display_name)
        VALUES ($1, $2)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(display_name)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_active_household(
    db: &PgPool,
    id: Uuid,
    household_id: Uuid,
) -> anyhow::Result<u64> {
    let result = sqlx::query("UPDATE profiles SET active_household_id = $2 WHERE id = $1")
        .bind(id)
        .bind(household_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// First household a user joins becomes their active one; later joins do
/// not steal the pointer.
pub async fn set_active_if_unset(
    db: &PgPool,
    id: Uuid,
    household_id: Uuid,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE profiles SET active_household_id = $2
        WHERE id = $1 AND active_household_id IS NULL
        "#,
    )
    .bind(id)
    .bind(household_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn update(
    db: &PgPool,
    id: Uuid,
    display_name: Option<&str>,
    avatar_url: Option<&str>,
) -> anyhow::Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET
            display_name = COALESCE($2, display_name),
            avatar_url = COALESCE($3, avatar_url)
        WHERE id = $1
        RETURNING id, display_name, avatar_url, active_household_id, created_at
        "#,
    )
    .bind(id)
    .bind(display_name)
    .bind(avatar_url)
    .fetch_optional(db)
    .await?;
    Ok(row)
}
