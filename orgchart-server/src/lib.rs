//! orgchart server - 员工目录与上下级层级服务
//!
//! # 架构概述
//!
//! - **数据库** (`db`): SQLite (sqlx) 连接池、迁移和仓储
//! - **认证** (`auth`): JWT + Argon2, 注销令牌吊销
//! - **层级** (`services::hierarchy`): 子树遍历、树构建、防环检查
//! - **查询** (`services::query`): 搜索、排序、分页
//! - **HTTP API** (`api`): RESTful JSON 接口
//!
//! # 模块结构
//!
//! ```text
//! orgchart-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── auth/          # JWT 认证、中间件、吊销
//! ├── services/      # 层级逻辑、查询解析、管理员引导
//! ├── api/           # HTTP 路由和处理器
//! ├── utils/         # 日志、错误重导出、请求参数
//! └── db/            # 数据库层
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ErrorBody, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置运行环境: 加载 .env 并初始化日志
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), None, log_dir.as_deref());
    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
 +-------------------------------------+
 |   orgchart  ::  employee directory  |
 +-------------------------------------+
   version {}
    "#,
        env!("CARGO_PKG_VERSION")
    );
}
