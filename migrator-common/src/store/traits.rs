use std::time::Duration;

use super::data_types::{FieldValue, KeyType, ScanPage};
use super::error::StoreResult;

/// 键空间操作 trait
pub trait KeyspaceOperations {
    /// 获取当前数据库的键总数
    fn db_size(&mut self) -> StoreResult<u64>;

    /// 获取键的数据类型
    fn key_type(&mut self, key: &str) -> StoreResult<KeyType>;

    /// 获取键的剩余生存时间（秒），-1 表示永不过期，-2 表示键不存在
    fn ttl(&mut self, key: &str) -> StoreResult<i64>;

    /// 按游标扫描匹配 `pattern` 的键，`count` 为每批的建议大小
    fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage<String>>;

    /// 删除键
    fn delete(&mut self, key: &str) -> StoreResult<bool>;

    /// 设置键的过期时间
    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool>;
}

/// 字符串操作 trait
pub trait StringOperations {
    /// 获取字符串值
    fn get(&mut self, key: &str) -> StoreResult<Option<String>>;

    /// 设置字符串值，`ttl` 为 None 时不设置过期时间
    fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()>;
}

/// 哈希表操作 trait
pub trait HashOperations {
    /// 获取哈希字段数量
    fn hlen(&mut self, key: &str) -> StoreResult<u64>;

    /// 按游标扫描哈希字段
    fn hscan(&mut self, key: &str, cursor: u64, count: usize) -> StoreResult<ScanPage<FieldValue>>;

    /// 批量设置哈希字段
    fn hset_many(&mut self, key: &str, pairs: &[FieldValue]) -> StoreResult<()>;
}

/// 列表操作 trait
pub trait ListOperations {
    /// 获取列表长度
    fn llen(&mut self, key: &str) -> StoreResult<u64>;

    /// 获取列表闭区间 `[start, stop]` 内的元素
    fn lrange(&mut self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>>;

    /// 从右侧批量推入元素，返回推入后的列表长度
    fn rpush_many(&mut self, key: &str, elements: &[String]) -> StoreResult<u64>;
}

/// 迁移引擎对一个存储实例所需的全部操作
pub trait StoreClient: KeyspaceOperations + StringOperations + HashOperations + ListOperations {}

impl<T> StoreClient for T where
    T: KeyspaceOperations + StringOperations + HashOperations + ListOperations
{
}
