use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// 过期时间管理器
#[derive(Debug, Clone, Default)]
pub struct ExpiryManager {
    expire_times: HashMap<String, u64>, // 键过期时间 (Unix时间戳)
}

impl ExpiryManager {
    /// 获取当前时间戳
    fn current_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    /// 设置键的过期时间
    pub fn set_expire(&mut self, key: &str, seconds: u64) {
        let expire_time = Self::current_timestamp() + seconds;
        self.expire_times.insert(key.to_string(), expire_time);
    }

    /// 获取键的剩余生存时间（秒），未设置时返回 None
    pub fn remaining(&self, key: &str) -> Option<i64> {
        self.expire_times.get(key).map(|expire_time| {
            let current_time = Self::current_timestamp();
            expire_time.saturating_sub(current_time) as i64
        })
    }

    /// 删除键的过期设置
    pub fn remove_key(&mut self, key: &str) -> bool {
        self.expire_times.remove(key).is_some()
    }

    /// 找出所有已过期的键
    pub fn find_expired_keys(&self) -> Vec<String> {
        let current_time = Self::current_timestamp();
        self.expire_times
            .iter()
            .filter(|(_, expire_time)| current_time >= **expire_time)
            .map(|(key, _)| key.clone())
            .collect()
    }
}
