use log::{error, trace};

use crate::config::MigrationOptions;
use crate::store::{HashOperations, KeyspaceOperations};
use super::cursor::CursorScan;
use super::error::MigrationResult;
use super::expiration::apply_expiration;
use super::tally::{CopyOutcome, KeyRecord};

pub struct HashCopier;

impl HashCopier {
    /// 按 HSCAN 批次复制一个哈希键
    ///
    /// 每个批次用一次 HSET 写入，目标端已有的多余字段保留。
    /// 批次读取失败时游标未知，放弃该键剩余的字段；
    /// 只有 [`StoreError::MalformedHashBatch`](crate::store::StoreError) 会中止迁移。
    pub fn copy<S, D>(
        source: &mut S,
        destination: &mut D,
        record: &KeyRecord,
        options: &MigrationOptions,
    ) -> MigrationResult<CopyOutcome>
    where
        S: HashOperations + ?Sized,
        D: HashOperations + KeyspaceOperations + ?Sized,
    {
        let key = record.source_key.as_str();
        let field_count = match source.hlen(key) {
            Ok(count) => count,
            Err(e) => {
                error!("无法获取源哈希 '{}' 的字段数: {}", key, e);
                return Ok(CopyOutcome::Incomplete);
            }
        };
        trace!("Hash '{}' has {} fields", key, field_count);

        if field_count == 0 {
            return Ok(CopyOutcome::Vanished);
        }

        let mut scan = CursorScan::new(format!("哈希 '{}'", key), options.max_scan_rounds);
        let mut outcome = CopyOutcome::Copied;
        let mut written = 0usize;

        loop {
            let batch = match scan.next_page(|cursor| source.hscan(key, cursor, options.hash_scan_count)) {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(e) if e.is_fatal() => {
                    error!("哈希 '{}' 的字段批次无效: {}", key, e);
                    return Err(e);
                }
                Err(e) => {
                    error!("读取源哈希 '{}' 失败，放弃剩余字段: {}", key, e);
                    outcome = CopyOutcome::Incomplete;
                    break;
                }
            };

            // HSCAN 可能返回空批次但游标不为 0
            if batch.is_empty() {
                continue;
            }

            match destination.hset_many(&record.destination_key, &batch) {
                Ok(()) => written += batch.len(),
                Err(e) => {
                    error!("无法写入目标哈希 '{}': {}", record.destination_key, e);
                    outcome = CopyOutcome::Incomplete;
                }
            }
        }

        trace!(
            "Hash '{}' -> '{}': {} fields in {} rounds",
            key,
            record.destination_key,
            written,
            scan.rounds()
        );
        Ok(apply_expiration(destination, record, outcome))
    }
}
