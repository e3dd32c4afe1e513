mod cli;

use log::{error, info};
use migrator_common::config::Settings;
use migrator_common::logger;
use migrator_common::migration::{write_report, Migrator};
use migrator_common::store::RedisStore;
use std::path::Path;
use std::process;

fn main() {
    // 解析命令行参数
    let matches = cli::build_cli().get_matches();

    // 加载配置
    let mut settings = match Settings::load(cli::config_path(&matches).as_deref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("加载配置失败: {}", e);
            process::exit(1);
        }
    };
    cli::apply_overrides(&mut settings, &matches);

    // 初始化日志
    if let Err(e) = logger::init_logger(settings.logging.log_file.as_deref(), &settings.logging.level) {
        eprintln!("初始化日志失败: {}", e);
        process::exit(1);
    }

    info!("迁移配置:\n{}", settings);

    let report = cli::report_path(&matches);
    if let Err(e) = run_migration(&settings, report.as_deref()) {
        error!("{}", e);
        process::exit(1);
    }
}

// 执行迁移，所有致命错误都在这里返回给 main
fn run_migration(settings: &Settings, report: Option<&Path>) -> Result<(), String> {
    settings.validate().map_err(|e| e.to_string())?;

    let mut source = RedisStore::connect("SOURCE", &settings.source)
        .map_err(|e| format!("SOURCE: {}", e))?;
    let mut destination = RedisStore::connect("DESTINATION", &settings.destination)
        .map_err(|e| format!("DESTINATION: {}", e))?;

    let summary = Migrator::new(&mut source, &mut destination, &settings.migration)
        .run()
        .map_err(|e| e.to_string())?;

    if let Some(path) = report {
        write_report(path, &summary)
            .map_err(|e| format!("无法写入迁移报告 {}: {}", path.display(), e))?;
        info!("迁移报告已写入 {}", path.display());
    }

    Ok(())
}
