use std::path::PathBuf;

/// 服务器配置 - 后台节点的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/tafel | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_MS | 30000 | 请求超时(毫秒) |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 关闭超时(毫秒) |
/// | OPENING_HOURS | 12:00-14:30,18:00-23:00 | 营业窗口 |
/// | SLOT_MINUTES | 30 | 时段粒度(分钟) |
/// | RESERVATION_SLOTS | 4 | 一次预订占用的时段数 |
/// | CLOSED_WEEKDAY | monday | 每周休息日 (Ruhetag) |
/// | HR_KEY | (无) | HR 字段加密密钥 (64 位 hex) |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/tafel HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、日志等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 请求超时时间 (毫秒)
    pub request_timeout_ms: u64,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,

    // === 预订时段配置 ===
    /// 营业窗口, 如 "12:00-14:30,18:00-23:00"
    pub opening_hours: String,
    /// 时段粒度 (分钟)
    pub slot_minutes: u32,
    /// 一次预订占用的连续时段数
    pub reservation_slots: u32,
    /// 每周休息日 ("monday".."sunday", 其它值 = 无休息日)
    pub closed_weekday: String,

    // === HR 加密 ===
    /// HR 字段加密密钥 (64 位 hex)，生产环境必填
    pub hr_key: Option<String>,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/tafel".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),

            opening_hours: std::env::var("OPENING_HOURS")
                .unwrap_or_else(|_| "12:00-14:30,18:00-23:00".into()),
            slot_minutes: std::env::var("SLOT_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30),
            reservation_slots: std::env::var("RESERVATION_SLOTS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4),
            closed_weekday: std::env::var("CLOSED_WEEKDAY").unwrap_or_else(|_| "monday".into()),

            hr_key: std::env::var("HR_KEY").ok().filter(|k| !k.is_empty()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.log_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
