//! 认证中间件
//!
//! 为 JWT 认证和授权提供 Axum 中间件

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::AppError;
use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use shared::error::ErrorCode;

/// 无需令牌的请求
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查等)
/// - 注册和登录
/// - 除 `/api/auth/me` 外的所有读请求 (GET / HEAD)
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }
    if method == Method::POST && matches!(path, "/api/auth/login" | "/api/auth/register") {
        return true;
    }
    (method == Method::GET || method == Method::HEAD) && path != "/api/auth/me"
}

/// 校验 Bearer 令牌并解析当前用户 (中间件和提取器共用)
pub(crate) fn authenticate(
    state: &ServerState,
    auth_header: Option<&str>,
    uri: &http::Uri,
) -> Result<CurrentUser, AppError> {
    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!("WARN", "auth_missing", uri = format!("{:?}", uri));
            return Err(AppError::not_authenticated());
        }
    };

    let claims = match state.get_jwt_service().validate_token(token) {
        Ok(claims) => claims,
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", uri)
            );
            return Err(match e {
                JwtError::ExpiredToken => AppError::token_expired(),
                _ => AppError::invalid_token("Invalid token"),
            });
        }
    };

    if state.revoked_tokens.is_revoked(&claims.jti) {
        security_log!(
            "WARN",
            "auth_revoked",
            username = claims.username.clone(),
            uri = format!("{:?}", uri)
        );
        return Err(AppError::token_revoked());
    }

    CurrentUser::try_from(claims)
        .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))
}

/// 认证中间件 - 要求用户登录
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT。
/// 验证成功后将 [`CurrentUser`] 注入请求扩展。公共请求见 [`is_public_route`]。
///
/// # 错误处理
///
/// | 错误 | HTTP 状态码 |
/// |------|------------|
/// | 无 Authorization 头 | 401 NotAuthenticated |
/// | 令牌过期 | 401 TokenExpired |
/// | 无效令牌 | 401 TokenInvalid |
/// | 已注销令牌 | 401 TokenRevoked |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = authenticate(&state, auth_header, req.uri())?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// 管理员中间件 - 要求管理员角色
///
/// # 错误
///
/// 未登录返回 401, 非管理员返回 403
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = user.id,
            username = user.username.clone()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::GET, "/health"));
        assert!(is_public_route(&Method::GET, "/api/employees"));
        assert!(is_public_route(&Method::GET, "/api/employees/12/subordinates"));
        assert!(is_public_route(&Method::POST, "/api/auth/login"));
        assert!(is_public_route(&Method::POST, "/api/auth/register"));
        assert!(is_public_route(&Method::OPTIONS, "/api/employees"));
    }

    #[test]
    fn test_protected_routes() {
        assert!(!is_public_route(&Method::POST, "/api/employees"));
        assert!(!is_public_route(&Method::PUT, "/api/employees/1"));
        assert!(!is_public_route(&Method::DELETE, "/api/positions/1"));
        assert!(!is_public_route(&Method::POST, "/api/auth/logout"));
        assert!(!is_public_route(&Method::GET, "/api/auth/me"));
    }
}
