use sqlx::PgPool;
use uuid::Uuid;

use crate::models::child::{Child, CreateChildRequest, UpdateChildRequest};

/// All child rows go through here; ownership is enforced in every query so a
/// child belonging to another account is indistinguishable from a missing one.
pub struct ChildRepository;

impl ChildRepository {
    pub async fn list(pool: &PgPool, owner_id: Uuid) -> anyhow::Result<Vec<Child>> {
        let children = sqlx::query_as::<_, Child>(
            "SELECT * FROM children WHERE owner_id = $1 ORDER BY birth_date DESC, name",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
        Ok(children)
    }

    pub async fn get(pool: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(
            "SELECT * FROM children WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        Ok(child)
    }

    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        req: &CreateChildRequest,
    ) -> anyhow::Result<Child> {
        let child = sqlx::query_as::<_, Child>(
            "INSERT INTO children (owner_id, name, birth_date, gender, notes)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(owner_id)
        .bind(&req.name)
        .bind(req.birth_date)
        .bind(&req.gender)
        .bind(&req.notes)
        .fetch_one(pool)
        .await?;
        Ok(child)
    }

    /// Partial update; absent fields keep their current value.
    /// Returns None when the child does not belong to the caller.
    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        req: &UpdateChildRequest,
    ) -> anyhow::Result<Option<Child>> {
        let child = sqlx::query_as::<_, Child>(
            "UPDATE children
             SET name       = COALESCE($1, name),
                 birth_date = COALESCE($2, birth_date),
                 gender     = COALESCE($3, gender),
                 notes      = COALESCE($4, notes),
                 updated_at = NOW()
             WHERE id = $5 AND owner_id = $6
             RETURNING *",
        )
        .bind(&req.name)
        .bind(req.birth_date)
        .bind(&req.gender)
        .bind(&req.notes)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;
        Ok(child)
    }

    /// Delete a child and its events. Two sequential statements, not a
    /// transaction: a failure between them leaves an event-less child, which
    /// a retry of the delete cleans up.
    pub async fn delete(pool: &PgPool, owner_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let owned: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM children WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;
        if !owned {
            return Ok(false);
        }

        sqlx::query("DELETE FROM events WHERE child_id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        sqlx::query("DELETE FROM children WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(true)
    }
}
