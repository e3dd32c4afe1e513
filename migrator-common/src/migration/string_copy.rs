use log::{error, trace};

use crate::store::StringOperations;
use super::error::MigrationResult;
use super::tally::{CopyOutcome, KeyRecord};

pub struct StringCopier;

impl StringCopier {
    /// 复制一个字符串键及其过期时间
    ///
    /// 读取或写入失败只记录日志，不会中止迁移。
    pub fn copy<S, D>(source: &mut S, destination: &mut D, record: &KeyRecord) -> MigrationResult<CopyOutcome>
    where
        S: StringOperations + ?Sized,
        D: StringOperations + ?Sized,
    {
        let value = match source.get(&record.source_key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                trace!("字符串 '{}' 已不存在", record.source_key);
                return Ok(CopyOutcome::Vanished);
            }
            Err(e) => {
                error!("无法读取源字符串 '{}': {}", record.source_key, e);
                return Ok(CopyOutcome::Incomplete);
            }
        };
        trace!("Key '{}' val '{}'", record.source_key, value);

        match destination.set(&record.destination_key, &value, record.expiration()) {
            Ok(()) => Ok(CopyOutcome::Copied),
            Err(e) => {
                error!("无法在目标端设置 '{}': {}", record.destination_key, e);
                Ok(CopyOutcome::Incomplete)
            }
        }
    }
}
