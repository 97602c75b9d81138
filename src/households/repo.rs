use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Household {
    pub id: Uuid,
    pub name: String,
    pub family_size: i32,
    pub weekly_budget: f64,
    pub created_at: OffsetDateTime,
}

/// Member row joined with the profile columns the member list displays.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberWithProfile {
    pub id: Uuid,
    pub household_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: OffsetDateTime,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HouseholdInvitation {
    pub id: Uuid,
    pub household_id: Uuid,
    /// Snapshot of the household name at invite time; renames do not
    /// update pending invitations.
    pub household_name: String,
    pub email: String,
    pub invited_by: Option<Uuid>,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Membership gate for household-scoped routes. Non-members get NotFound so
/// the route does not confirm the household exists. Returns the caller's role.
pub async fn require_member(
    db: &PgPool,
    household_id: Uuid,
    user_id: Uuid,
) -> Result<String, AppError> {
    let role = sqlx::query_scalar::<_, String>(
        r#"
        SELECT role FROM household_members
        WHERE household_id = $1 AND user_id = $2
        "#,
    )
    .bind(household_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    role.ok_or_else(|| AppError::not_found("Household not found"))
}

/// Household creation is one logical transaction: the household row, the
/// creator's owner membership, and the creator's active-household pointer
/// land together or not at all.
pub async fn create_with_owner(
    db: &PgPool,
    name: &str,
    family_size: i32,
    weekly_budget: f64,
    owner_user_id: Uuid,
) -> anyhow::Result<Household> {
    let mut tx = db.begin().await?;

    let household = sqlx::query_as::<_, Household>(
        r#"
        INSERT INTO households (name, family_size, weekly_budget)
        VALUES ($1, $2, $3)
        RETURNING id, name, family_size, weekly_budget, created_at
        "#,
    )
    .bind(name)
    .bind(family_size)
    .bind(weekly_budget)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO household_members (household_id, user_id, role)
        VALUES ($1, $2, 'owner')
        "#,
    )
    .bind(household.id)
    .bind(owner_user_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE profiles SET active_household_id = $1 WHERE id = $2")
        .bind(household.id)
        .bind(owner_user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(household)
}

pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Household>> {
    let row = sqlx::query_as::<_, Household>(
        r#"
        SELECT id, name, family_size, weekly_budget, created_at
        FROM households
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

/// Partial update; unset fields keep their current values.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    name: Option<&str>,
    family_size: Option<i32>,
    weekly_budget: Option<f64>,
) -> anyhow::Result<Option<Household>> {
    let row = sqlx::query_as::<_, Household>(
        r#"
        UPDATE households SET
            name = COALESCE($2, name),
            family_size = COALESCE($3, family_size),
            weekly_budget = COALESCE($4, weekly_budget)
        WHERE id = $1
        RETURNING id, name, family_size, weekly_budget, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(family_size)
    .bind(weekly_budget)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Household>> {
    let rows = sqlx::query_as::<_, Household>(
        r#"
        SELECT h.id, h.name, h.family_size, h.weekly_budget, h.created_at
        FROM households h
        JOIN household_members m ON m.household_id = h.id
        WHERE m.user_id = $1
        ORDER BY m.joined_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn members_with_profiles(
    db: &PgPool,
    household_id: Uuid,
) -> anyhow::Result<Vec<MemberWithProfile>> {
    let rows = sqlx::query_as::<_, MemberWithProfile>(
        r#"
        SELECT m.id, m.household_id, m.user_id, m.role, m.joined_at,
               p.display_name, p.avatar_url
        FROM household_members m
        LEFT JOIN profiles p ON p.id = m.user_id
        WHERE m.household_id = $1
        ORDER BY m.joined_at ASC
        "#,
    )
    .bind(household_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn remove_member(
    db: &PgPool,
    household_id: Uuid,
    user_id: Uuid,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        "DELETE FROM household_members WHERE household_id = $1 AND user_id = $2",
    )
    .bind(household_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

/// Guard for double-accept: the unique (household_id, user_id) target makes
/// re-running an accept a no-op instead of a duplicate membership row.
pub async fn insert_membership_if_absent(
    db: &PgPool,
    household_id: Uuid,
    user_id: Uuid,
    role: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO household_members (household_id, user_id, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (household_id, user_id) DO NOTHING
        "#,
    )
    .bind(household_id)
    .bind(user_id)
    .bind(role)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn create_invitation(
    db: &PgPool,
    household_id: Uuid,
    household_name: &str,
    email: &str,
    invited_by: Uuid,
) -> anyhow::Result<HouseholdInvitation> {
    let row = sqlx::query_as::<_, HouseholdInvitation>(
        r#"
        INSERT INTO household_invitations (household_id, household_name, email, invited_by)
        VALUES ($1, $2, LOWER($3), $4)
        RETURNING id, household_id, household_name, email, invited_by, status, created_at, expires_at
        "#,
    )
    .bind(household_id)
    .bind(household_name)
    .bind(email)
    .bind(invited_by)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_invitation(
    db: &PgPool,
    id: Uuid,
) -> anyhow::Result<Option<HouseholdInvitation>> {
    let row = sqlx::query_as::<_, HouseholdInvitation>(
        r#"
        SELECT id, household_id, household_name, email, invited_by, status, created_at, expires_at
        FROM household_invitations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn pending_invitations_for_household(
    db: &PgPool,
    household_id: Uuid,
) -> anyhow::Result<Vec<HouseholdInvitation>> {
    let rows = sqlx::query_as::<_, HouseholdInvitation>(
        r#"
        SELECT id, household_id, household_name, email, invited_by, status, created_at, expires_at
        FROM household_invitations
        WHERE household_id = $1 AND status = 'pending'
        ORDER BY created_at DESC
        "#,
    )
    .bind(household_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Invitation emails are stored lowercased; lowering the probe side too
/// makes the match case-insensitive end to end.
pub async fn pending_invitations_for_email(
    db: &PgPool,
    email: &str,
) -> anyhow::Result<Vec<HouseholdInvitation>> {
    let rows = sqlx::query_as::<_, HouseholdInvitation>(
        r#"
        SELECT id, household_id, household_name, email, invited_by, status, created_at, expires_at
        FROM household_invitations
        WHERE status = 'pending' AND email = LOWER($1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(email)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn set_invitation_status(
    db: &PgPool,
    id: Uuid,
    status: &str,
) -> anyhow::Result<u64> {
    let result = sqlx::query("UPDATE household_invitations SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_invitation(db: &PgPool, id: Uuid) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM household_invitations WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
