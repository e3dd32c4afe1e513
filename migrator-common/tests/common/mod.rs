#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use migrator_common::config::MigrationOptions;
use migrator_common::store::{
    FieldValue, HashOperations, KeyType, KeyspaceOperations, ListOperations, MemoryStore,
    ScanPage, StoreError, StoreResult, StringOperations,
};

/// 测试用的迁移参数：关闭进度输出
pub fn options() -> MigrationOptions {
    MigrationOptions {
        show_progress: false,
        ..MigrationOptions::default()
    }
}

/// 填充一个包含 `count` 个元素的列表，元素为 `item-0`、`item-1`……
pub fn fill_list(store: &mut MemoryStore, key: &str, count: usize) -> Vec<String> {
    let items: Vec<String> = (0..count).map(|i| format!("item-{}", i)).collect();
    for item in &items {
        store.rpush(key, item);
    }
    items
}

/// 在 [`MemoryStore`] 外包一层，按配置注入各种故障
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    /// TYPE 返回 none 的键，模拟枚举后被删除
    pub vanishing: HashSet<String>,
    /// HSCAN 返回奇数长度批次的键
    pub malformed_hashes: HashSet<String>,
    /// GET 失败的键
    pub failing_gets: HashSet<String>,
    /// TYPE 失败的键
    pub failing_types: HashSet<String>,
    /// 在第 n 次（从 0 开始）HSCAN 时失败的键
    pub failing_hscan_round: HashMap<String, u64>,
    /// LRANGE 起始位置等于这些值时失败
    pub failing_lrange_starts: HashSet<i64>,
    /// SCAN 直接失败
    pub failing_scan: bool,
    /// SCAN 永远不返回游标 0
    pub endless_scan: bool,
    /// DBSIZE 失败
    pub failing_db_size: bool,
    hscan_rounds: HashMap<String, u64>,
}

impl FaultyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    fn injected(command: &str) -> StoreError {
        StoreError::command(command, "injected failure")
    }
}

impl KeyspaceOperations for FaultyStore {
    fn db_size(&mut self) -> StoreResult<u64> {
        if self.failing_db_size {
            return Err(StoreError::Connection("connection refused".to_string()));
        }
        self.inner.db_size()
    }

    fn key_type(&mut self, key: &str) -> StoreResult<KeyType> {
        if self.failing_types.contains(key) {
            return Err(Self::injected("TYPE"));
        }
        if self.vanishing.contains(key) {
            return Ok(KeyType::None);
        }
        self.inner.key_type(key)
    }

    fn ttl(&mut self, key: &str) -> StoreResult<i64> {
        self.inner.ttl(key)
    }

    fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage<String>> {
        if self.failing_scan {
            return Err(Self::injected("SCAN"));
        }
        if self.endless_scan {
            return Ok(ScanPage::new(cursor + 1, Vec::new()));
        }
        self.inner.scan(cursor, pattern, count)
    }

    fn delete(&mut self, key: &str) -> StoreResult<bool> {
        self.inner.delete(key)
    }

    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool> {
        self.inner.expire(key, seconds)
    }
}

impl StringOperations for FaultyStore {
    fn get(&mut self, key: &str) -> StoreResult<Option<String>> {
        if self.failing_gets.contains(key) {
            return Err(Self::injected("GET"));
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        self.inner.set(key, value, ttl)
    }
}

impl HashOperations for FaultyStore {
    fn hlen(&mut self, key: &str) -> StoreResult<u64> {
        self.inner.hlen(key)
    }

    fn hscan(&mut self, key: &str, cursor: u64, count: usize) -> StoreResult<ScanPage<FieldValue>> {
        if self.malformed_hashes.contains(key) {
            return Err(StoreError::MalformedHashBatch {
                key: key.to_string(),
                len: 3,
            });
        }

        let round = self.hscan_rounds.entry(key.to_string()).or_insert(0);
        let current = *round;
        *round += 1;
        if self.failing_hscan_round.get(key) == Some(&current) {
            return Err(Self::injected("HSCAN"));
        }
        self.inner.hscan(key, cursor, count)
    }

    fn hset_many(&mut self, key: &str, pairs: &[FieldValue]) -> StoreResult<()> {
        self.inner.hset_many(key, pairs)
    }
}

impl ListOperations for FaultyStore {
    fn llen(&mut self, key: &str) -> StoreResult<u64> {
        self.inner.llen(key)
    }

    fn lrange(&mut self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        if self.failing_lrange_starts.contains(&start) {
            return Err(Self::injected("LRANGE"));
        }
        self.inner.lrange(key, start, stop)
    }

    fn rpush_many(&mut self, key: &str, elements: &[String]) -> StoreResult<u64> {
        self.inner.rpush_many(key, elements)
    }
}
