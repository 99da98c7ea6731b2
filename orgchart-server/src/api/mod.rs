//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 注册、登录、注销
//! - [`employees`] - 员工目录与层级接口
//! - [`positions`] - 职位管理接口

pub mod auth;
pub mod employees;
pub mod extract;
pub mod health;
pub mod positions;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

pub use extract::{ApiJson, ApiPath, ApiQuery, ValidatedJson};

/// Build the Axum router (without state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        // Health API - public route
        .merge(health::router())
        // Auth API - login/register public, me/logout authenticated
        .merge(auth::router())
        // Directory APIs - reads public, writes authenticated
        .merge(employees::router())
        .merge(positions::router())
}

/// Build a fully configured application with all middleware and state
///
/// Used by both the HTTP server and the integration tests
pub fn build_app(state: ServerState) -> Router {
    build_router()
        // JWT 认证中间件 - require_auth 内部会跳过公共路由
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Trace - Request tracing
        .layer(TraceLayer::new_for_http())
}
