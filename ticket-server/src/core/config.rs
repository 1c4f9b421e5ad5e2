use crate::auth::JwtConfig;

/// 服务器配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | DATA_DIR | /var/lib/ticket-server | 数据目录 (嵌入式数据库) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | MAX_TICKETS_PER_BOOKING | 5 | 单笔预订最大票数 |
/// | ADMIN_SIGNUP_PIN | (未设置) | 管理员注册 PIN |
/// | LOG_DIR | (未设置) | 日志目录 (设置后输出到文件) |
///
/// # 示例
///
/// ```ignore
/// DATA_DIR=/data/tickets HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 数据目录，存储嵌入式数据库和日志
    pub data_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 单笔预订允许的最大票数 (预订策略)
    pub max_tickets_per_booking: i64,
    /// 管理员注册 PIN；未设置时禁止注册管理员账号
    pub admin_signup_pin: Option<String>,
    /// 日志目录 (可选)
    pub log_dir: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "/var/lib/ticket-server".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::default(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            max_tickets_per_booking: std::env::var("MAX_TICKETS_PER_BOOKING")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5),
            admin_signup_pin: std::env::var("ADMIN_SIGNUP_PIN").ok(),
            log_dir: std::env::var("LOG_DIR").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        // 不读环境变量相关断言，只验证默认策略值
        let config = Config {
            data_dir: "/tmp".into(),
            http_port: 3000,
            jwt: JwtConfig {
                secret: "test-secret-test-secret-test-secret!".into(),
                expiration_minutes: 60,
                issuer: "ticket-server".into(),
                audience: "ticket-clients".into(),
            },
            environment: "development".into(),
            max_tickets_per_booking: 5,
            admin_signup_pin: None,
            log_dir: None,
        };
        assert_eq!(config.max_tickets_per_booking, 5);
        assert!(config.admin_signup_pin.is_none());
    }
}
