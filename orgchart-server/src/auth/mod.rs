//! 认证授权模块
//!
//! 提供 JWT 认证、密码哈希、令牌吊销和中间件：
//! - [`JwtService`] - JWT 令牌服务
//! - [`CurrentUser`] - 当前用户上下文
//! - [`RevokedTokens`] - 注销令牌表
//! - [`require_auth`] - 认证中间件
//! - [`require_admin`] - 管理员检查中间件

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{is_public_route, require_admin, require_auth};
pub use password::{hash_password, verify_password};
pub use revocation::RevokedTokens;
