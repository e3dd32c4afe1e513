use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::time::Duration;

use super::data_types::{DataType, FieldValue, KeyType, ScanPage};
use super::error::{StoreError, StoreResult};
use super::expiry::ExpiryManager;
use super::pattern::glob_match;
use super::traits::{HashOperations, KeyspaceOperations, ListOperations, StringOperations};

/// SCAN/HSCAN 未指定 COUNT 时的默认批次大小
const DEFAULT_SCAN_COUNT: usize = 10;

/// 进程内存储，实现与远程存储相同的操作集合
///
/// 键和哈希字段都保存在有序映射中，游标即下一次扫描的起始位置，
/// 因此在两次扫描之间不修改数据时，扫描结果稳定且不重复。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, DataType>,
    expiry_manager: ExpiryManager,
    writes: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 清理过期键
    fn purge_expired(&mut self) {
        for key in self.expiry_manager.find_expired_keys() {
            self.data.remove(&key);
            self.expiry_manager.remove_key(&key);
        }
    }

    fn type_mismatch(key: &str, expected: &str, found: &DataType) -> StoreError {
        StoreError::TypeMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            found: found.type_name().to_string(),
        }
    }

    /// 通过 trait 接口执行过的写操作次数
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// 当前所有未过期的键
    pub fn keys(&mut self) -> Vec<String> {
        self.purge_expired();
        self.data.keys().cloned().collect()
    }

    pub fn contains_key(&mut self, key: &str) -> bool {
        self.purge_expired();
        self.data.contains_key(key)
    }

    /// 设置字符串值
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.data
            .insert(key.to_string(), DataType::String(value.to_string()));
        self.expiry_manager.remove_key(key);
    }

    /// 设置单个哈希字段，已存在的非哈希值会被替换
    pub fn hset(&mut self, key: &str, field: &str, value: &str) {
        match self.data.get_mut(key) {
            Some(DataType::Hash(hash)) => {
                hash.insert(field.to_string(), value.to_string());
            }
            _ => {
                let mut new_hash = BTreeMap::new();
                new_hash.insert(field.to_string(), value.to_string());
                self.data.insert(key.to_string(), DataType::Hash(new_hash));
            }
        }
    }

    /// 从右侧推入单个元素，已存在的非列表值会被替换
    pub fn rpush(&mut self, key: &str, value: &str) {
        match self.data.get_mut(key) {
            Some(DataType::List(list)) => list.push_back(value.to_string()),
            _ => {
                let mut new_list = VecDeque::new();
                new_list.push_back(value.to_string());
                self.data.insert(key.to_string(), DataType::List(new_list));
            }
        }
    }

    /// 添加集合成员
    pub fn sadd(&mut self, key: &str, member: &str) {
        match self.data.get_mut(key) {
            Some(DataType::Set(set)) => {
                set.insert(member.to_string());
            }
            _ => {
                let mut new_set = BTreeSet::new();
                new_set.insert(member.to_string());
                self.data.insert(key.to_string(), DataType::Set(new_set));
            }
        }
    }

    /// 设置键的过期时间，键不存在时返回 false
    pub fn set_expire(&mut self, key: &str, seconds: u64) -> bool {
        if !self.data.contains_key(key) {
            return false;
        }
        self.expiry_manager.set_expire(key, seconds);
        true
    }

    /// 获取字符串值，非字符串类型返回 None
    pub fn string_value(&mut self, key: &str) -> Option<String> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::String(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// 获取哈希的全部字段
    pub fn hash_value(&mut self, key: &str) -> Option<BTreeMap<String, String>> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::Hash(hash)) => Some(hash.clone()),
            _ => None,
        }
    }

    /// 获取列表的全部元素
    pub fn list_value(&mut self, key: &str) -> Option<Vec<String>> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::List(list)) => Some(list.iter().cloned().collect()),
            _ => None,
        }
    }

    /// 从 `cursor` 位置开始取出最多 `count` 个条目，返回下一个游标
    fn page_bounds(cursor: u64, count: usize, len: usize) -> (usize, usize, u64) {
        let count = if count == 0 { DEFAULT_SCAN_COUNT } else { count };
        let start = (cursor as usize).min(len);
        let end = start.saturating_add(count).min(len);
        let next = if end >= len { 0 } else { end as u64 };
        (start, end, next)
    }
}

impl KeyspaceOperations for MemoryStore {
    fn db_size(&mut self) -> StoreResult<u64> {
        self.purge_expired();
        Ok(self.data.len() as u64)
    }

    fn key_type(&mut self, key: &str) -> StoreResult<KeyType> {
        self.purge_expired();
        Ok(self
            .data
            .get(key)
            .map(|value| KeyType::parse(value.type_name()))
            .unwrap_or(KeyType::None))
    }

    fn ttl(&mut self, key: &str) -> StoreResult<i64> {
        self.purge_expired();
        if !self.data.contains_key(key) {
            return Ok(-2);
        }
        Ok(self.expiry_manager.remaining(key).unwrap_or(-1))
    }

    fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage<String>> {
        self.purge_expired();
        let (start, end, next) = Self::page_bounds(cursor, count, self.data.len());
        let keys = self
            .data
            .keys()
            .skip(start)
            .take(end - start)
            .filter(|key| glob_match(pattern, key))
            .cloned()
            .collect();
        Ok(ScanPage::new(next, keys))
    }

    fn delete(&mut self, key: &str) -> StoreResult<bool> {
        self.purge_expired();
        self.writes += 1;
        self.expiry_manager.remove_key(key);
        Ok(self.data.remove(key).is_some())
    }

    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool> {
        self.purge_expired();
        self.writes += 1;
        Ok(self.set_expire(key, seconds))
    }
}

impl StringOperations for MemoryStore {
    fn get(&mut self, key: &str) -> StoreResult<Option<String>> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(Self::type_mismatch(key, "string", other)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        self.purge_expired();
        self.writes += 1;
        self.set_string(key, value);
        if let Some(ttl) = ttl {
            self.expiry_manager.set_expire(key, ttl.as_secs());
        }
        Ok(())
    }
}

impl HashOperations for MemoryStore {
    fn hlen(&mut self, key: &str) -> StoreResult<u64> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::Hash(hash)) => Ok(hash.len() as u64),
            Some(other) => Err(Self::type_mismatch(key, "hash", other)),
            None => Ok(0),
        }
    }

    fn hscan(&mut self, key: &str, cursor: u64, count: usize) -> StoreResult<ScanPage<FieldValue>> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::Hash(hash)) => {
                let (start, end, next) = Self::page_bounds(cursor, count, hash.len());
                let pairs = hash
                    .iter()
                    .skip(start)
                    .take(end - start)
                    .map(|(field, value)| FieldValue::new(field.as_str(), value.as_str()))
                    .collect();
                Ok(ScanPage::new(next, pairs))
            }
            Some(other) => Err(Self::type_mismatch(key, "hash", other)),
            None => Ok(ScanPage::new(0, Vec::new())),
        }
    }

    fn hset_many(&mut self, key: &str, pairs: &[FieldValue]) -> StoreResult<()> {
        self.purge_expired();
        if pairs.is_empty() {
            return Err(StoreError::command("HSET", "wrong number of arguments"));
        }
        match self.data.get_mut(key) {
            Some(DataType::Hash(hash)) => {
                for pair in pairs {
                    hash.insert(pair.field.clone(), pair.value.clone());
                }
            }
            Some(other) => return Err(Self::type_mismatch(key, "hash", other)),
            None => {
                let new_hash = pairs
                    .iter()
                    .map(|pair| (pair.field.clone(), pair.value.clone()))
                    .collect();
                self.data.insert(key.to_string(), DataType::Hash(new_hash));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

impl ListOperations for MemoryStore {
    fn llen(&mut self, key: &str) -> StoreResult<u64> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::List(list)) => Ok(list.len() as u64),
            Some(other) => Err(Self::type_mismatch(key, "list", other)),
            None => Ok(0),
        }
    }

    fn lrange(&mut self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.purge_expired();
        match self.data.get(key) {
            Some(DataType::List(list)) => {
                let len = list.len() as i64;
                if len == 0 {
                    return Ok(vec![]);
                }

                // 处理负索引，stop 为闭区间
                let start_idx = if start < 0 { (len + start).max(0) } else { start.min(len) };
                let end_idx = if stop < 0 { (len + stop + 1).max(0) } else { (stop + 1).min(len) };

                if start_idx >= end_idx {
                    return Ok(vec![]);
                }

                Ok(list
                    .iter()
                    .skip(start_idx as usize)
                    .take((end_idx - start_idx) as usize)
                    .cloned()
                    .collect())
            }
            Some(other) => Err(Self::type_mismatch(key, "list", other)),
            None => Ok(vec![]),
        }
    }

    fn rpush_many(&mut self, key: &str, elements: &[String]) -> StoreResult<u64> {
        self.purge_expired();
        if elements.is_empty() {
            return Err(StoreError::command("RPUSH", "wrong number of arguments"));
        }
        let entry = self
            .data
            .entry(key.to_string())
            .or_insert_with(|| DataType::List(VecDeque::new()));
        let list = match entry {
            DataType::List(list) => list,
            other => return Err(Self::type_mismatch(key, "list", other)),
        };
        list.extend(elements.iter().cloned());
        let len = list.len() as u64;
        self.writes += 1;
        Ok(len)
    }
}
