//! 初始管理员引导
//!
//! 启动时若配置了 `ADMIN_USERNAME` / `ADMIN_PASSWORD` 且用户不存在, 创建管理员账户。

use sqlx::SqlitePool;

use crate::auth::hash_password;
use crate::core::AdminBootstrap;
use crate::db::repository::user::{self, NewUser};
use crate::utils::AppError;

/// 确保管理员存在; 返回是否新建
pub async fn ensure_admin(pool: &SqlitePool, admin: &AdminBootstrap) -> Result<bool, AppError> {
    if user::find_by_username(pool, &admin.username).await?.is_some() {
        tracing::debug!(username = %admin.username, "Admin account already exists");
        return Ok(false);
    }

    let hash_pass = hash_password(&admin.password)
        .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;

    let created = user::create(
        pool,
        NewUser {
            username: &admin.username,
            email: &admin.email,
            hash_pass: &hash_pass,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, "Admin account created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::db::repository::testing::pool;

    fn admin() -> AdminBootstrap {
        AdminBootstrap {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "s3cret-passw0rd".into(),
        }
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let pool = pool().await;
        assert!(ensure_admin(&pool, &admin()).await.unwrap());
        assert!(!ensure_admin(&pool, &admin()).await.unwrap());

        let stored = user::find_by_username(&pool, "admin").await.unwrap().unwrap();
        assert!(stored.is_admin);
        assert!(verify_password("s3cret-passw0rd", &stored.hash_pass));
    }
}
