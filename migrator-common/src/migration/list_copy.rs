use log::{error, trace};

use crate::config::MigrationOptions;
use crate::store::{KeyspaceOperations, ListOperations};
use super::error::MigrationResult;
use super::expiration::apply_expiration;
use super::tally::{CopyOutcome, KeyRecord};

pub struct ListCopier;

impl ListCopier {
    /// 分页复制一个列表键
    ///
    /// 先删除目标键，再按页 LRANGE + RPUSH，目标列表与源列表顺序一致。
    pub fn copy<S, D>(
        source: &mut S,
        destination: &mut D,
        record: &KeyRecord,
        options: &MigrationOptions,
    ) -> MigrationResult<CopyOutcome>
    where
        S: ListOperations + ?Sized,
        D: ListOperations + KeyspaceOperations + ?Sized,
    {
        let key = record.source_key.as_str();
        let item_count = match source.llen(key) {
            Ok(count) => count,
            Err(e) => {
                error!("无法获取源列表 '{}' 的长度: {}", key, e);
                return Ok(CopyOutcome::Incomplete);
            }
        };
        trace!("List '{}' has {} items", key, item_count);

        if item_count == 0 {
            return Ok(CopyOutcome::Vanished);
        }

        // 删除目标键，避免与上次运行残留的数据混在一起
        if let Err(e) = destination.delete(&record.destination_key) {
            error!("无法删除目标列表 '{}': {}", record.destination_key, e);
            return Ok(CopyOutcome::Incomplete);
        }

        let mut outcome = CopyOutcome::Copied;
        for (start, stop) in page_ranges(item_count, options.list_page_size as u64) {
            let items = match source.lrange(key, start, stop) {
                Ok(items) => items,
                Err(e) => {
                    error!("读取源列表 '{}' [{}, {}] 失败: {}", key, start, stop, e);
                    outcome = CopyOutcome::Incomplete;
                    continue;
                }
            };

            if items.is_empty() {
                continue;
            }

            if let Err(e) = destination.rpush_many(&record.destination_key, &items) {
                error!(
                    "无法追加到目标列表 '{}' [{}, {}]: {}",
                    record.destination_key, start, stop, e
                );
                outcome = CopyOutcome::Incomplete;
            }
        }

        Ok(apply_expiration(destination, record, outcome))
    }
}

/// 计算每页的闭区间 `[start, stop]`，相邻页互不重叠
pub fn page_ranges(item_count: u64, page_size: u64) -> impl Iterator<Item = (i64, i64)> {
    let page_size = page_size.max(1);
    let pages = item_count.div_ceil(page_size);
    (0..pages).map(move |page| {
        let start = page * page_size;
        let end = start.saturating_add(page_size).min(item_count);
        (start as i64, end as i64 - 1)
    })
}
