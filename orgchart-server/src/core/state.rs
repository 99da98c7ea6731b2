use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RevokedTokens};
use crate::core::tasks::BackgroundTasks;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::services::bootstrap;

/// 注销令牌清理周期
const REVOCATION_PURGE_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝, 每个请求克隆一次。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | 数据库连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
/// | revoked_tokens | Arc<RevokedTokens> | 已注销令牌 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 已注销令牌表
    pub revoked_tokens: Arc<RevokedTokens>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造)
    ///
    /// 通常使用 [`initialize()`](Self::initialize) 代替
    pub fn new(config: Config, pool: SqlitePool) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            pool,
            jwt_service,
            revoked_tokens: Arc::new(RevokedTokens::new()),
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开数据库并执行迁移
    /// 2. 按配置创建初始管理员
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url)
            .await
            .map_err(|e| ServerError::Database(e.message))?;

        if let Some(admin) = &config.admin {
            bootstrap::ensure_admin(&db.pool, admin).await?;
        }

        Ok(Self::new(config.clone(), db.pool))
    }

    /// 启动后台任务 (注销令牌清理)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let revoked = self.revoked_tokens.clone();
        tasks.spawn_periodic("revocation_purge", REVOCATION_PURGE_INTERVAL, move || {
            let revoked = revoked.clone();
            async move {
                let purged = revoked.purge_expired(chrono::Utc::now().timestamp());
                if purged > 0 {
                    tracing::debug!(purged, remaining = revoked.len(), "Purged expired revoked tokens");
                }
            }
        });

        tasks.log_summary();
        tasks
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_initialize_with_admin() {
        let mut config = Config::ephemeral();
        config.admin = Some(crate::core::AdminBootstrap {
            username: "admin".into(),
            email: String::new(),
            password: "long-enough-password".into(),
        });

        let state = ServerState::initialize(&config).await.unwrap();
        let admin = crate::db::repository::user::find_by_username(state.pool(), "admin")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);
        assert!(state.revoked_tokens.is_empty());
    }
}
