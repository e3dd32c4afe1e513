use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use super::error::{StoreError, StoreResult};

/// `TYPE` 命令报告的键类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyType {
    String,
    Hash,
    List,
    /// 键不存在（可能在枚举之后被删除或过期）
    None,
    /// 迁移不支持的其他类型
    Other(String),
}

impl KeyType {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "string" => KeyType::String,
            "hash" => KeyType::Hash,
            "list" => KeyType::List,
            "none" => KeyType::None,
            other => KeyType::Other(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            KeyType::String => "string",
            KeyType::Hash => "hash",
            KeyType::List => "list",
            KeyType::None => "none",
            KeyType::Other(name) => name,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// 哈希的一个字段及其值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValue {
    pub field: String,
    pub value: String,
}

impl FieldValue {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// 将 `[f1, v1, f2, v2, ...]` 形式的平铺回复转换为字段对。
    ///
    /// 长度为奇数时返回原始长度。
    pub fn pairs_from_flat(flat: Vec<String>) -> Result<Vec<FieldValue>, usize> {
        if flat.len() % 2 != 0 {
            return Err(flat.len());
        }

        let mut pairs = Vec::with_capacity(flat.len() / 2);
        let mut iter = flat.into_iter();
        while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
            pairs.push(FieldValue { field, value });
        }
        Ok(pairs)
    }

    /// HSCAN 回复转换为字段对，长度为奇数时返回 [`StoreError::MalformedHashBatch`]
    pub fn pairs_for_key(key: &str, flat: Vec<String>) -> StoreResult<Vec<FieldValue>> {
        Self::pairs_from_flat(flat).map_err(|len| StoreError::MalformedHashBatch {
            key: key.to_string(),
            len,
        })
    }
}

/// 一次游标扫描返回的分页结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage<T> {
    /// 下一次调用使用的游标，0 表示扫描结束
    pub cursor: u64,
    pub items: Vec<T>,
}

impl<T> ScanPage<T> {
    pub fn new(cursor: u64, items: Vec<T>) -> Self {
        Self { cursor, items }
    }
}

/// 内存存储中保存的值
#[derive(Debug, Clone)]
pub enum DataType {
    /// 字符串类型
    String(String),
    /// 列表类型（双向队列实现）
    List(VecDeque<String>),
    /// 哈希表类型，字段有序以保证 HSCAN 游标稳定
    Hash(BTreeMap<String, String>),
    /// 集合类型
    Set(BTreeSet<String>),
}

impl DataType {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataType::String(_) => "string",
            DataType::List(_) => "list",
            DataType::Hash(_) => "hash",
            DataType::Set(_) => "set",
        }
    }
}
