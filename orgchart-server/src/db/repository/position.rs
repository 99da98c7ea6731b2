//! Position Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Position, PositionCreate, PositionUpdate, PositionWithCount};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

fn not_found(id: i64) -> RepoError {
    RepoError::Business(ErrorCode::PositionNotFound, format!("Position {id} not found"))
}

/// All positions with the number of employees holding each
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<PositionWithCount>> {
    let positions = sqlx::query_as::<_, PositionWithCount>(
        "SELECT p.id, p.name, p.created_at, COUNT(e.id) AS employee_count \
         FROM position p LEFT JOIN employee e ON e.position_id = p.id \
         GROUP BY p.id ORDER BY p.name COLLATE NOCASE, p.id",
    )
    .fetch_all(pool)
    .await?;
    Ok(positions)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Position>> {
    let position =
        sqlx::query_as::<_, Position>("SELECT id, name, created_at FROM position WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(position)
}

pub async fn create(pool: &SqlitePool, data: PositionCreate) -> RepoResult<Position> {
    let id = snowflake_id();
    sqlx::query("INSERT INTO position (id, name, created_at) VALUES (?, ?, ?)")
        .bind(id)
        .bind(data.name.trim())
        .bind(now_millis())
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create position".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: PositionUpdate) -> RepoResult<Position> {
    let name = data.name.as_deref().map(str::trim);
    let rows = sqlx::query("UPDATE position SET name = COALESCE(?1, name) WHERE id = ?2")
        .bind(name)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }
    find_by_id(pool, id).await?.ok_or_else(|| not_found(id))
}

/// Delete a position; employees holding it keep existing with no position
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE employee SET position_id = NULL, updated_at = ? WHERE position_id = ?")
        .bind(now_millis())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("DELETE FROM position WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id));
    }

    tx.commit().await?;
    Ok(true)
}
