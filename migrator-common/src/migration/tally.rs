use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::store::KeyType;

/// 扫描到的一个源键，复制完成后即丢弃
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub source_key: String,
    pub destination_key: String,
    pub value_type: KeyType,
    /// 源端报告的剩余生存时间（秒），小于 1 表示不过期
    pub ttl: i64,
}

impl KeyRecord {
    /// 写入目标端时使用的过期时间，小于 1 秒的值（-1、-2、0）一律视为不过期
    pub fn expiration(&self) -> Option<Duration> {
        normalize_ttl(self.ttl)
    }
}

pub fn normalize_ttl(ttl: i64) -> Option<Duration> {
    if ttl < 1 {
        None
    } else {
        Some(Duration::from_secs(ttl as u64))
    }
}

/// 单个键的复制结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// 完整复制
    Copied,
    /// 键在枚举后消失
    Vanished,
    /// 部分或全部内容因可恢复错误未能复制
    Incomplete,
}

/// 迁移计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationTally {
    pub migrated: u64,
    pub skipped: u64,
    pub failed: u64,
}

impl MigrationTally {
    pub fn record(&mut self, outcome: CopyOutcome) {
        match outcome {
            CopyOutcome::Copied => self.migrated += 1,
            CopyOutcome::Vanished => self.skipped += 1,
            CopyOutcome::Incomplete => self.failed += 1,
        }
    }

    pub fn processed(&self) -> u64 {
        self.migrated + self.skipped + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_below_one_second_means_persistent() {
        assert_eq!(normalize_ttl(-2), None);
        assert_eq!(normalize_ttl(-1), None);
        assert_eq!(normalize_ttl(0), None);
        assert_eq!(normalize_ttl(1), Some(Duration::from_secs(1)));
        assert_eq!(normalize_ttl(3600), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn tally_counts_outcomes() {
        let mut tally = MigrationTally::default();
        tally.record(CopyOutcome::Copied);
        tally.record(CopyOutcome::Copied);
        tally.record(CopyOutcome::Vanished);
        tally.record(CopyOutcome::Incomplete);
        assert_eq!(tally, MigrationTally { migrated: 2, skipped: 1, failed: 1 });
        assert_eq!(tally.processed(), 4);
    }
}
