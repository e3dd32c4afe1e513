use thiserror::Error;

/// 存储适配器错误类型
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 无法建立或维持连接
    #[error("连接错误: {0}")]
    Connection(String),
    /// 命令执行失败
    #[error("命令 {command} 执行失败: {message}")]
    Command { command: String, message: String },
    /// 响应无法解析
    #[error("协议错误: {0}")]
    Protocol(String),
    /// HSCAN 返回的字段/值序列长度为奇数
    #[error("哈希 '{key}' 的字段批次长度为奇数 ({len})")]
    MalformedHashBatch { key: String, len: usize },
    /// 类型不匹配
    #[error("键 '{key}' 类型不匹配: 期望 {expected}, 实际 {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },
}

impl StoreError {
    pub fn command(command: &str, message: impl Into<String>) -> Self {
        StoreError::Command {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// 是否必须中止整个迁移
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::MalformedHashBatch { .. })
    }
}

impl From<redis::RedisError> for StoreError {
    fn from(error: redis::RedisError) -> Self {
        if error.is_connection_dropped() || error.is_connection_refusal() || error.is_io_error() {
            StoreError::Connection(error.to_string())
        } else if error.kind() == redis::ErrorKind::TypeError {
            StoreError::Protocol(error.to_string())
        } else {
            StoreError::Command {
                command: error.code().unwrap_or("UNKNOWN").to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// 存储操作结果类型
pub type StoreResult<T> = Result<T, StoreError>;
