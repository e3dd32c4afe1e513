use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use migrator_common::config::{ServerConfig, Settings};
use std::path::PathBuf;

const DESCRIPTION: &str = "将一个服务器/数据库中的键迁移到另一个服务器/数据库。
未通过参数提供的连接信息从环境变量 (KVMIGRATE_*) 或配置文件读取。";

/// 一侧服务器的参数名
struct ServerFlags {
    label: &'static str,
    host: &'static str,
    port: &'static str,
    db: &'static str,
    user: &'static str,
    pass: &'static str,
}

const SOURCE_FLAGS: ServerFlags = ServerFlags {
    label: "源",
    host: "source-host",
    port: "source-port",
    db: "source-db",
    user: "source-user",
    pass: "source-pass",
};

const DESTINATION_FLAGS: ServerFlags = ServerFlags {
    label: "目标",
    host: "destination-host",
    port: "destination-port",
    db: "destination-db",
    user: "destination-user",
    pass: "destination-pass",
};

fn server_args(command: Command, flags: &ServerFlags) -> Command {
    command
        .arg(
            Arg::new(flags.host)
                .long(flags.host)
                .value_name("HOST")
                .help(format!("{}服务器主机地址", flags.label))
                .num_args(1),
        )
        .arg(
            Arg::new(flags.port)
                .long(flags.port)
                .value_name("PORT")
                .help(format!("{}服务器端口 [默认: 6379]", flags.label))
                .value_parser(value_parser!(u16))
                .num_args(1),
        )
        .arg(
            Arg::new(flags.db)
                .long(flags.db)
                .value_name("INDEX")
                .help(format!("{}数据库索引 [默认: 0]", flags.label))
                .value_parser(value_parser!(i64))
                .num_args(1),
        )
        .arg(
            Arg::new(flags.user)
                .long(flags.user)
                .value_name("USER")
                .help(format!("{}认证用户名", flags.label))
                .num_args(1),
        )
        .arg(
            Arg::new(flags.pass)
                .long(flags.pass)
                .value_name("PASSWORD")
                .help(format!("{}认证密码", flags.label))
                .num_args(1),
        )
}

pub fn build_cli() -> Command {
    let command = Command::new("kv-migrate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Copy keys between key-value store instances")
        .long_about(DESCRIPTION)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径 (TOML)")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            Arg::new("source-filter")
                .long("source-filter")
                .value_name("PATTERN")
                .help("源键过滤条件 [默认: *]")
                .num_args(1),
        )
        .arg(
            Arg::new("destination-prefix")
                .long("destination-prefix")
                .value_name("PREFIX")
                .help("目标键前缀")
                .num_args(1),
        )
        .arg(
            Arg::new("report")
                .long("report")
                .value_name("FILE")
                .help("将迁移报告以 JSON 格式写入文件")
                .value_parser(value_parser!(PathBuf))
                .num_args(1),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .value_name("FILE")
                .help("日志文件路径")
                .num_args(1),
        )
        .arg(
            Arg::new("no-progress")
                .long("no-progress")
                .help("不显示进度点")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("输出更多信息")
                .action(ArgAction::SetTrue),
        );

    let command = server_args(command, &SOURCE_FLAGS);
    server_args(command, &DESTINATION_FLAGS)
}

pub fn config_path(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>("config").cloned()
}

pub fn report_path(matches: &ArgMatches) -> Option<PathBuf> {
    matches.get_one::<PathBuf>("report").cloned()
}

fn apply_server(server: &mut ServerConfig, matches: &ArgMatches, flags: &ServerFlags) {
    if let Some(host) = matches.get_one::<String>(flags.host) {
        server.host = host.clone();
    }
    if let Some(port) = matches.get_one::<u16>(flags.port) {
        server.port = *port;
    }
    if let Some(db) = matches.get_one::<i64>(flags.db) {
        server.db = *db;
    }
    if let Some(user) = matches.get_one::<String>(flags.user) {
        server.username = Some(user.clone());
    }
    if let Some(pass) = matches.get_one::<String>(flags.pass) {
        server.password = Some(pass.clone());
    }
}

/// 命令行参数优先于配置文件和环境变量
pub fn apply_overrides(settings: &mut Settings, matches: &ArgMatches) {
    apply_server(&mut settings.source, matches, &SOURCE_FLAGS);
    apply_server(&mut settings.destination, matches, &DESTINATION_FLAGS);

    if let Some(filter) = matches.get_one::<String>("source-filter") {
        settings.migration.key_filter = filter.clone();
    }
    if let Some(prefix) = matches.get_one::<String>("destination-prefix") {
        settings.migration.key_prefix = prefix.clone();
    }
    if let Some(log_file) = matches.get_one::<String>("log-file") {
        settings.logging.log_file = Some(log_file.clone());
    }
    if matches.get_flag("no-progress") {
        settings.migration.show_progress = false;
    }
    if matches.get_flag("verbose") {
        settings.logging.level = "trace".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::load(None).unwrap()
    }

    #[test]
    fn flags_override_settings() {
        let matches = build_cli().get_matches_from([
            "kv-migrate",
            "--source-host",
            "10.0.0.1",
            "--source-port",
            "6380",
            "--destination-host",
            "10.0.0.2",
            "--destination-db",
            "3",
            "--destination-user",
            "admin",
            "--destination-pass",
            "secret",
            "--source-filter",
            "user:*",
            "--destination-prefix",
            "migrated:",
            "--no-progress",
            "-v",
        ]);
        let mut settings = settings();
        apply_overrides(&mut settings, &matches);

        assert_eq!(settings.source.address(), "10.0.0.1:6380");
        assert_eq!(settings.destination.address(), "10.0.0.2:6379");
        assert_eq!(settings.destination.db, 3);
        assert_eq!(settings.destination.auth_mode(), "Username and Password");
        assert_eq!(settings.migration.key_filter, "user:*");
        assert_eq!(settings.migration.key_prefix, "migrated:");
        assert!(!settings.migration.show_progress);
        assert_eq!(settings.logging.level, "trace");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn defaults_are_kept_without_flags() {
        let matches = build_cli().get_matches_from(["kv-migrate"]);
        let mut settings = settings();
        let before = settings.clone();
        apply_overrides(&mut settings, &matches);
        assert_eq!(settings, before);
        assert_eq!(config_path(&matches), None);
        assert_eq!(report_path(&matches), None);
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = build_cli().try_get_matches_from(["kv-migrate", "--source-port", "70000"]);
        assert!(result.is_err());
    }

    #[test]
    fn identical_servers_fail_validation() {
        let matches = build_cli().get_matches_from([
            "kv-migrate",
            "--source-host",
            "cache",
            "--destination-host",
            "cache",
        ]);
        let mut settings = settings();
        apply_overrides(&mut settings, &matches);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
