use chrono::Local;
use log::{error, info, warn};

use crate::config::MigrationOptions;
use crate::store::StoreClient;
use super::driver::MigrationDriver;
use super::error::{MigrationError, MigrationResult};
use super::progress::Progress;
use super::report::{MigrationStatus, MigrationSummary};
use super::tally::MigrationTally;

/// 一次完整的迁移：预检、驱动扫描、汇总结果
pub struct Migrator<'a, S: ?Sized, D: ?Sized> {
    source: &'a mut S,
    destination: &'a mut D,
    options: &'a MigrationOptions,
    progress: Option<Progress>,
}

impl<'a, S, D> Migrator<'a, S, D>
where
    S: StoreClient + ?Sized,
    D: StoreClient + ?Sized,
{
    pub fn new(source: &'a mut S, destination: &'a mut D, options: &'a MigrationOptions) -> Self {
        Self {
            source,
            destination,
            options,
            progress: None,
        }
    }

    /// 使用自定义的进度输出
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn run(self) -> MigrationResult<MigrationSummary> {
        let started_at = Local::now();
        let options = self.options;

        let source_keys = self
            .source
            .db_size()
            .map_err(MigrationError::SourceUnavailable)?;
        info!("{}", source_found_message(source_keys, &options.key_filter));

        let mut tally = MigrationTally::default();
        let summary = |status: MigrationStatus, destination_keys_before: Option<u64>, tally: MigrationTally| {
            let finished_at = Local::now();
            MigrationSummary {
                status,
                key_filter: options.key_filter.clone(),
                key_prefix: options.key_prefix.clone(),
                source_keys,
                destination_keys_before,
                tally,
                started_at,
                finished_at,
                elapsed_ms: (finished_at - started_at).num_milliseconds(),
            }
        };

        if source_keys == 0 {
            warn!("源端没有任何键，迁移未执行");
            return Ok(summary(MigrationStatus::SourceEmpty, None, tally));
        }

        let destination_keys = self
            .destination
            .db_size()
            .map_err(MigrationError::DestinationUnavailable)?;
        info!("Destination has {} keys", destination_keys);

        let progress = self.progress.unwrap_or_else(|| Progress::new(options));
        if progress.is_enabled() {
            info!(
                "迁移开始，过滤条件: '{}'，每个点代表 {} 个键，每行 {} 个键",
                options.key_filter,
                options.progress_interval,
                progress.keys_per_row()
            );
        } else {
            info!("迁移开始，过滤条件: '{}'", options.key_filter);
        }

        let mut driver = MigrationDriver::new(self.source, self.destination, options, progress);
        if let Err(e) = driver.run(&mut tally) {
            error!(
                "Migration was NOT completed! 已迁移 {} 个键, 跳过 {} 个, 失败 {} 个",
                tally.migrated, tally.skipped, tally.failed
            );
            return Err(e);
        }

        let summary = summary(MigrationStatus::Completed, Some(destination_keys), tally);
        if summary.is_clean() {
            info!(
                "Migration completed with {} keys, {} skipped :)",
                tally.migrated, tally.skipped
            );
        } else {
            warn!(
                "迁移完成: {} 个键已迁移, {} 个跳过, {} 个未能完整复制",
                tally.migrated, tally.skipped, tally.failed
            );
        }
        Ok(summary)
    }
}

// 预检时同时报告源端键数和过滤条件
fn source_found_message(source_keys: u64, key_filter: &str) -> String {
    format!("Found {} keys on SOURCE with Key filter: {}", source_keys, key_filter)
}
