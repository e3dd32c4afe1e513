use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// 环境变量前缀，例如 `KVMIGRATE_SOURCE__HOST`
pub const ENV_PREFIX: &str = "KVMIGRATE";

const DEFAULT_CONFIG: &str = r#"[source]
# 源服务器IP地址（必填）
host = ""
# 源服务器端口
port = 6379
# 源数据库索引
db = 0
# 连接超时(秒)，0 表示不设超时
connect_timeout_seconds = 10

[destination]
host = ""
port = 6379
db = 0
connect_timeout_seconds = 10

[migration]
# 源键过滤条件（glob）
key_filter = "*"
# 目标键前缀
key_prefix = ""
# 每次 SCAN 的批次大小
scan_count = 1000
# 每次 HSCAN 的批次大小
hash_scan_count = 1000
# 列表迁移的分页大小
list_page_size = 1000
# 单次游标扫描允许的最大轮数
max_scan_rounds = 10000000
# 是否显示进度点
show_progress = true
# 每隔多少个键输出一个进度点
progress_interval = 1000

[logging]
# 日志级别: "error", "warn", "info", "debug", "trace"
level = "info"
"#;

#[derive(Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub connect_timeout_seconds: u64,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db", &self.db)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        match self.connect_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// 认证方式描述，不包含密码
    pub fn auth_mode(&self) -> &'static str {
        let has_user = self.username.as_deref().map_or(false, |u| !u.is_empty());
        let has_pass = self.password.as_deref().map_or(false, |p| !p.is_empty());
        if has_user {
            "Username and Password"
        } else if has_pass {
            "Password only"
        } else {
            "None"
        }
    }

    /// 检查连接参数是否完整
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Message("未指定服务器地址".to_string()));
        }
        let has_user = self.username.as_deref().map_or(false, |u| !u.is_empty());
        let has_pass = self.password.as_deref().map_or(false, |p| !p.is_empty());
        if has_user && !has_pass {
            return Err(ConfigError::Message(
                "指定用户名时必须同时提供密码".to_string(),
            ));
        }
        Ok(())
    }

    /// 主机、端口和数据库索引都相同时视为同一个目标
    pub fn same_target(&self, other: &ServerConfig) -> bool {
        self.host == other.host && self.port == other.port && self.db == other.db
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MigrationOptions {
    pub key_filter: String,
    pub key_prefix: String,
    pub scan_count: usize,
    pub hash_scan_count: usize,
    pub list_page_size: usize,
    pub max_scan_rounds: u64,
    pub show_progress: bool,
    pub progress_interval: u64,
}

impl MigrationOptions {
    /// 由源键得到目标键
    pub fn destination_key(&self, source_key: &str) -> String {
        format!("{}{}", self.key_prefix, source_key)
    }
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            key_filter: "*".to_string(),
            key_prefix: String::new(),
            scan_count: 1000,
            hash_scan_count: 1000,
            list_page_size: 1000,
            max_scan_rounds: 10_000_000,
            show_progress: true,
            progress_interval: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// 日志文件路径，未设置时只输出到终端
    pub log_file: Option<String>,
    pub level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Settings {
    pub source: ServerConfig,
    pub destination: ServerConfig,
    pub migration: MigrationOptions,
    pub logging: LoggingConfig,
}

impl Settings {
    /// 加载配置：内置默认值 < 配置文件 < 环境变量
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(ConfigError::Message(format!(
                    "配置文件不存在: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// 迁移前的配置检查
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.source
            .check()
            .map_err(|e| ConfigError::Message(format!("SOURCE: {}", e)))?;
        self.destination
            .check()
            .map_err(|e| ConfigError::Message(format!("DESTINATION: {}", e)))?;
        if self.source.same_target(&self.destination) {
            return Err(ConfigError::Message(
                "源和目标配置不能完全相同".to_string(),
            ));
        }
        if self.migration.scan_count == 0 || self.migration.list_page_size == 0 {
            return Err(ConfigError::Message(
                "scan_count 和 list_page_size 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, server) in [("SOURCE", &self.source), ("DESTINATION", &self.destination)] {
            writeln!(f, "{}:", name)?;
            writeln!(f, "  Server:   {}", server.address())?;
            writeln!(f, "  DB Index: {}", server.db)?;
            writeln!(f, "  Auth:     {}", server.auth_mode())?;
        }
        writeln!(f, "FILTER:   {}", self.migration.key_filter)?;
        write!(f, "PREFIX:   {}", self.migration.key_prefix)
    }
}
