use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;
use std::path::Path;

/// 解析日志级别名称，无法识别时使用 info
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

pub fn init_logger(log_file: Option<&str>, level: &str) -> Result<(), SetLoggerError> {
    let level_filter = parse_level(level);

    // 输出到终端的日志
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level_filter,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(log_file) = log_file {
        // 确保日志目录存在
        if let Some(parent) = Path::new(log_file).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    eprintln!("无法创建日志目录: {}", e);
                }
            }
        }

        // 打开日志文件失败时只保留终端日志
        match OpenOptions::new().create(true).append(true).open(log_file) {
            Ok(file) => loggers.push(WriteLogger::new(level_filter, Config::default(), file)),
            Err(e) => eprintln!("无法打开日志文件 {}: {}", log_file, e),
        }
    }

    CombinedLogger::init(loggers)
}
