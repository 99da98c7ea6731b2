//! User Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::User;
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, username, email, hash_pass, is_admin, is_active, created_at FROM app_user";

/// Fields of a new account; the password is already hashed
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub hash_pass: &'a str,
    pub is_admin: bool,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("{USER_SELECT} WHERE username = ?"))
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, data: NewUser<'_>) -> RepoResult<User> {
    let id = snowflake_id();
    let result = sqlx::query(
        "INSERT INTO app_user (id, username, email, hash_pass, is_admin, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?, 1, ?)",
    )
    .bind(id)
    .bind(data.username)
    .bind(data.email)
    .bind(data.hash_pass)
    .bind(data.is_admin)
    .bind(now_millis())
    .execute(pool)
    .await;

    match result.map_err(RepoError::from) {
        Ok(_) => {}
        Err(RepoError::Duplicate(_)) => {
            return Err(RepoError::Business(
                ErrorCode::UsernameExists,
                format!("Username '{}' is already taken", data.username),
            ));
        }
        Err(e) => return Err(e),
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
