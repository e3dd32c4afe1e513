use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use super::tally::MigrationTally;

/// 迁移的最终状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationStatus {
    /// 源键空间已扫描完毕
    Completed,
    /// 源端没有任何键，未执行迁移
    SourceEmpty,
}

/// 一次迁移运行的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationSummary {
    pub status: MigrationStatus,
    pub key_filter: String,
    pub key_prefix: String,
    /// 预检时源端的键总数
    pub source_keys: u64,
    /// 预检时目标端的键总数，源端为空时未查询
    pub destination_keys_before: Option<u64>,
    pub tally: MigrationTally,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
    pub elapsed_ms: i64,
}

impl MigrationSummary {
    pub fn is_clean(&self) -> bool {
        self.tally.failed == 0
    }
}

/// 以 JSON 格式写出迁移报告
pub fn write_report(path: &Path, summary: &MigrationSummary) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(summary).map_err(io::Error::from)?;
    fs::write(path, json)
}

/// 读取之前写出的迁移报告
pub fn read_report(path: &Path) -> io::Result<MigrationSummary> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(io::Error::from)
}
