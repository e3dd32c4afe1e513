use log::{error, trace};

use crate::store::KeyspaceOperations;
use super::tally::{CopyOutcome, KeyRecord};

/// 为复制完成的哈希或列表设置过期时间
pub(super) fn apply_expiration<D>(destination: &mut D, record: &KeyRecord, outcome: CopyOutcome) -> CopyOutcome
where
    D: KeyspaceOperations + ?Sized,
{
    let ttl = match (outcome, record.expiration()) {
        (CopyOutcome::Vanished, _) | (_, None) => return outcome,
        (_, Some(ttl)) => ttl,
    };

    match destination.expire(&record.destination_key, ttl.as_secs()) {
        Ok(true) => {
            trace!("'{}' 过期时间设置为 {} 秒", record.destination_key, ttl.as_secs());
            outcome
        }
        Ok(false) => {
            error!("目标键 '{}' 不存在，无法设置过期时间", record.destination_key);
            CopyOutcome::Incomplete
        }
        Err(e) => {
            error!("无法为 '{}' 设置过期时间: {}", record.destination_key, e);
            CopyOutcome::Incomplete
        }
    }
}
