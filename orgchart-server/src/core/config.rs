use crate::auth::JwtConfig;
use crate::core::{Result, ServerError};

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATABASE_URL | sqlite:orgchart.db | SQLite 数据库 |
/// | HTTP_HOST | 0.0.0.0 | 监听地址 |
/// | HTTP_PORT | 8000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (未设置) | 日志目录 (按天滚动) |
/// | JWT_SECRET | 开发环境自动生成 | 签名密钥, 至少 32 字符 |
/// | JWT_EXPIRATION_MINUTES | 1440 | 令牌有效期 |
/// | JWT_ISSUER / JWT_AUDIENCE | orgchart-server / orgchart-clients | 令牌声明 |
/// | DEFAULT_PAGE_SIZE / MAX_PAGE_SIZE | 20 / 100 | 分页 |
/// | ADMIN_USERNAME / ADMIN_EMAIL / ADMIN_PASSWORD | (未设置) | 初始管理员 |
///
/// # 示例
///
/// ```ignore
/// DATABASE_URL=sqlite:/data/orgchart.db HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 连接串 (`sqlite:path` 或 `sqlite::memory:`)
    pub database_url: String,
    pub http_host: String,
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 列表默认每页数量
    pub default_page_size: u32,
    /// 每页数量上限
    pub max_page_size: u32,
    /// 初始管理员 (用户名和密码均设置时启用)
    pub admin: Option<AdminBootstrap>,
}

/// 启动时创建的管理员账户
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值; 非开发环境缺少合格的 JWT_SECRET 时返回错误
    pub fn from_env() -> Result<Self> {
        let environment = env_or("ENVIRONMENT", "development");
        let jwt = JwtConfig::from_env(environment == "development")?;

        let admin = match (
            std::env::var("ADMIN_USERNAME").ok(),
            std::env::var("ADMIN_PASSWORD").ok(),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap {
                    email: env_or("ADMIN_EMAIL", ""),
                    username,
                    password,
                })
            }
            _ => None,
        };

        let config = Self {
            database_url: env_or("DATABASE_URL", "sqlite:orgchart.db"),
            http_host: env_or("HTTP_HOST", "0.0.0.0"),
            http_port: env_parse("HTTP_PORT", 8000),
            environment,
            log_level: env_or("LOG_LEVEL", "info"),
            log_dir: std::env::var("LOG_DIR").ok(),
            jwt,
            default_page_size: env_parse("DEFAULT_PAGE_SIZE", 20),
            max_page_size: env_parse("MAX_PAGE_SIZE", 100),
            admin,
        };
        config.validate()?;
        Ok(config)
    }

    /// 内存数据库 + 随机密钥, 用于测试和本地演示
    pub fn ephemeral() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            http_host: "127.0.0.1".to_string(),
            http_port: 0,
            environment: "development".to_string(),
            log_level: "debug".to_string(),
            log_dir: None,
            jwt: JwtConfig::with_secret(crate::auth::jwt::generate_secure_printable_jwt_secret()),
            default_page_size: 20,
            max_page_size: 100,
            admin: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            return Err(ServerError::Config("MAX_PAGE_SIZE must be positive".into()));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ServerError::Config(format!(
                "DEFAULT_PAGE_SIZE must be within 1..={}",
                self.max_page_size
            )));
        }
        Ok(())
    }

    /// 监听地址 `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ephemeral_config_is_valid() {
        let config = Config::ephemeral();
        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert!(!config.is_production());
        assert!(config.jwt.secret.len() >= 32);
    }

    #[test]
    fn test_validate_page_sizes() {
        let mut config = Config::ephemeral();
        config.default_page_size = 500;
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        config.default_page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_addr() {
        let mut config = Config::ephemeral();
        config.http_port = 8000;
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
    }
}
