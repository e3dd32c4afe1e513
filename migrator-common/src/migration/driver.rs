use log::{error, trace, warn};

use crate::config::MigrationOptions;
use crate::store::{KeyType, StoreClient};
use super::cursor::CursorScan;
use super::error::{MigrationError, MigrationResult};
use super::hash_copy::HashCopier;
use super::list_copy::ListCopier;
use super::progress::Progress;
use super::string_copy::StringCopier;
use super::tally::{CopyOutcome, KeyRecord, MigrationTally};

/// 按批扫描源键空间，并把每个键分派给对应类型的复制器
pub struct MigrationDriver<'a, S: ?Sized, D: ?Sized> {
    source: &'a mut S,
    destination: &'a mut D,
    options: &'a MigrationOptions,
    progress: Progress,
}

impl<'a, S, D> MigrationDriver<'a, S, D>
where
    S: StoreClient + ?Sized,
    D: StoreClient + ?Sized,
{
    pub fn new(source: &'a mut S, destination: &'a mut D, options: &'a MigrationOptions, progress: Progress) -> Self {
        Self {
            source,
            destination,
            options,
            progress,
        }
    }

    /// 扫描直到源端返回游标 0，逐个键更新 `tally`
    pub fn run(&mut self, tally: &mut MigrationTally) -> MigrationResult<()> {
        let options = self.options;
        let mut scan = CursorScan::new("键空间", options.max_scan_rounds);

        loop {
            let source = &mut *self.source;
            let keys = match scan.next_page(|cursor| source.scan(cursor, &options.key_filter, options.scan_count)) {
                Ok(Some(keys)) => keys,
                Ok(None) => break,
                Err(MigrationError::Store(e)) => {
                    error!("Scan Error: {}", e);
                    return Err(MigrationError::ScanFailed(e));
                }
                Err(e) => return Err(e),
            };

            for source_key in &keys {
                let outcome = self.migrate_key(source_key)?;
                tally.record(outcome);
            }
            self.progress.advance(keys.len() as u64);
        }

        self.progress.finish();
        Ok(())
    }

    /// 查询键的类型和过期时间，查询失败时返回 None
    fn inspect(&mut self, source_key: &str) -> Option<KeyRecord> {
        let value_type = match self.source.key_type(source_key) {
            Ok(value_type) => value_type,
            Err(e) => {
                warn!("无法获取 '{}' 的类型: {}", source_key, e);
                return None;
            }
        };

        let ttl = if value_type == KeyType::None {
            -2
        } else {
            match self.source.ttl(source_key) {
                Ok(ttl) => ttl,
                Err(e) => {
                    warn!("无法获取 '{}' 的过期时间: {}", source_key, e);
                    return None;
                }
            }
        };

        Some(KeyRecord {
            source_key: source_key.to_string(),
            destination_key: self.options.destination_key(source_key),
            value_type,
            ttl,
        })
    }

    /// 迁移单个键。只有致命错误会返回 `Err`。
    pub fn migrate_key(&mut self, source_key: &str) -> MigrationResult<CopyOutcome> {
        let record = match self.inspect(source_key) {
            Some(record) => record,
            None => return Ok(CopyOutcome::Incomplete),
        };

        trace!(
            "Key '{}' type '{}' ttl: {} destination: '{}'",
            record.source_key,
            record.value_type,
            record.ttl,
            record.destination_key
        );

        let source = &mut *self.source;
        let destination = &mut *self.destination;
        match &record.value_type {
            KeyType::String => StringCopier::copy(source, destination, &record),
            KeyType::Hash => HashCopier::copy(source, destination, &record, self.options),
            KeyType::List => ListCopier::copy(source, destination, &record, self.options),
            // 键在枚举之后已被删除或过期
            KeyType::None => Ok(CopyOutcome::Vanished),
            KeyType::Other(type_name) => {
                error!("Key type not yet supported: {} ('{}')", type_name, record.source_key);
                Err(MigrationError::UnsupportedKeyType {
                    key: record.source_key.clone(),
                    type_name: type_name.clone(),
                })
            }
        }
    }
}
