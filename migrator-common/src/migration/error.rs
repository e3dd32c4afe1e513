use thiserror::Error;

use crate::store::StoreError;

/// 迁移过程中的致命错误，出现时整个迁移中止
#[derive(Debug, Error)]
pub enum MigrationError {
    /// 预检时无法访问源端
    #[error("SOURCE: {0}")]
    SourceUnavailable(StoreError),
    /// 预检时无法访问目标端
    #[error("DESTINATION: {0}")]
    DestinationUnavailable(StoreError),
    /// 键空间扫描失败，游标丢失
    #[error("扫描源键失败: {0}")]
    ScanFailed(StoreError),
    /// 遇到不支持的键类型
    #[error("键 '{key}' 的类型 '{type_name}' 暂不支持，迁移未完成")]
    UnsupportedKeyType { key: String, type_name: String },
    /// 游标扫描超过最大轮数仍未结束
    #[error("{scope} 扫描超过 {rounds} 轮仍未结束")]
    ScanRoundLimit { scope: String, rounds: u64 },
    /// 存储返回了致命错误
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MigrationError {
    pub fn is_fatal(&self) -> bool {
        match self {
            MigrationError::Store(e) => e.is_fatal(),
            _ => true,
        }
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;
