use migrator_common::config::{MigrationOptions, ServerConfig, Settings};
use std::fs;

fn server(host: &str, db: i64) -> ServerConfig {
    ServerConfig {
        host: host.to_string(),
        port: 6379,
        db,
        username: None,
        password: None,
        connect_timeout_seconds: 10,
    }
}

fn valid_settings() -> Settings {
    let mut settings = Settings::load(None).unwrap();
    settings.source = server("10.0.0.1", 0);
    settings.destination = server("10.0.0.2", 0);
    settings
}

#[test]
fn test_config_default_values() {
    let config = Settings::load(None).unwrap();

    // 服务器默认配置
    assert_eq!(config.source.host, "");
    assert_eq!(config.source.port, 6379);
    assert_eq!(config.source.db, 0);
    assert_eq!(config.source.username, None);
    assert_eq!(config.destination.port, 6379);

    // 迁移默认配置与代码中的默认值一致
    assert_eq!(config.migration, MigrationOptions::default());
    assert_eq!(config.migration.key_filter, "*");
    assert_eq!(config.migration.scan_count, 1000);
    assert_eq!(config.migration.max_scan_rounds, 10_000_000);

    // 日志默认配置
    assert_eq!(config.logging.log_file, None);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("migrate.toml");
    fs::write(
        &path,
        r#"
[source]
host = "cache-a"
port = 6380
db = 2

[destination]
host = "cache-b"
username = "admin"
password = "secret"

[migration]
key_filter = "user:*"
key_prefix = "migrated:"
list_page_size = 500

[logging]
log_file = "logs/migrate.log"
level = "debug"
"#,
    )
    .unwrap();

    let config = Settings::load(Some(&path)).unwrap();

    assert_eq!(config.source.address(), "cache-a:6380");
    assert_eq!(config.source.db, 2);
    assert_eq!(config.destination.address(), "cache-b:6379");
    assert_eq!(config.destination.username.as_deref(), Some("admin"));
    assert_eq!(config.migration.key_filter, "user:*");
    assert_eq!(config.migration.destination_key("user:1"), "migrated:user:1");
    assert_eq!(config.migration.list_page_size, 500);
    // 文件中未出现的字段保持默认值
    assert_eq!(config.migration.hash_scan_count, 1000);
    assert_eq!(config.logging.log_file.as_deref(), Some("logs/migrate.log"));
    assert_eq!(config.logging.level, "debug");
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(Settings::load(Some(&path)).is_err());
}

#[test]
fn test_validate_requires_hosts() {
    let mut settings = valid_settings();
    settings.source.host = String::new();
    let err = settings.validate().unwrap_err().to_string();
    assert!(err.contains("SOURCE"), "{}", err);

    let mut settings = valid_settings();
    settings.destination.host = "  ".to_string();
    let err = settings.validate().unwrap_err().to_string();
    assert!(err.contains("DESTINATION"), "{}", err);
}

#[test]
fn test_validate_rejects_identical_targets() {
    let mut settings = valid_settings();
    settings.destination = server("10.0.0.1", 0);
    assert!(settings.validate().is_err());

    // 同一台服务器的不同数据库是允许的
    settings.destination.db = 1;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_validate_requires_password_with_username() {
    let mut settings = valid_settings();
    settings.source.username = Some("admin".to_string());
    assert!(settings.validate().is_err());

    settings.source.password = Some("secret".to_string());
    assert!(settings.validate().is_ok());
}

#[test]
fn test_validate_rejects_zero_batch_sizes() {
    let mut settings = valid_settings();
    settings.migration.scan_count = 0;
    assert!(settings.validate().is_err());

    let mut settings = valid_settings();
    settings.migration.list_page_size = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_auth_mode_and_display() {
    let mut settings = valid_settings();
    assert_eq!(settings.source.auth_mode(), "None");

    settings.source.password = Some("hunter2".to_string());
    assert_eq!(settings.source.auth_mode(), "Password only");

    settings.destination.username = Some("admin".to_string());
    settings.destination.password = Some("hunter2".to_string());
    assert_eq!(settings.destination.auth_mode(), "Username and Password");

    settings.migration.key_filter = "user:*".to_string();
    let text = settings.to_string();
    assert!(text.contains("Server:   10.0.0.1:6379"));
    assert!(text.contains("Auth:     Password only"));
    assert!(text.contains("FILTER:   user:*"));
    // 密码不会出现在任何输出中
    assert!(!text.contains("hunter2"));
    assert!(!format!("{:?}", settings.source).contains("hunter2"));
}

#[test]
fn test_connect_timeout() {
    let mut config = server("localhost", 0);
    assert_eq!(config.connect_timeout().map(|d| d.as_secs()), Some(10));
    config.connect_timeout_seconds = 0;
    assert_eq!(config.connect_timeout(), None);
}
