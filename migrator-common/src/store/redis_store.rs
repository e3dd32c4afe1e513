use std::time::Duration;

use log::{debug, info};
use redis::{Client, Connection, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};

use crate::config::ServerConfig;
use super::data_types::{FieldValue, KeyType, ScanPage};
use super::error::{StoreError, StoreResult};
use super::traits::{HashOperations, KeyspaceOperations, ListOperations, StringOperations};

/// 基于 `redis` 客户端的阻塞式存储适配器，整个进程生命周期内持有一个连接
pub struct RedisStore {
    label: String,
    conn: Connection,
}

impl RedisStore {
    /// 连接到服务器，`label` 只用于日志
    pub fn connect(label: &str, server: &ServerConfig) -> StoreResult<Self> {
        let info = ConnectionInfo {
            addr: ConnectionAddr::Tcp(server.host.clone(), server.port),
            redis: RedisConnectionInfo {
                db: server.db,
                username: server.username.clone(),
                password: server.password.clone(),
                ..Default::default()
            },
        };

        info!("{}: 尝试连接到服务器 {}", label, server.address());
        let client = Client::open(info)
            .map_err(|e| StoreError::Connection(format!("{}: {}", server.address(), e)))?;
        let conn = match server.connect_timeout() {
            Some(timeout) => client.get_connection_with_timeout(timeout),
            None => client.get_connection(),
        }
        .map_err(|e| StoreError::Connection(format!("{}: {}", server.address(), e)))?;

        info!("{}: 已连接到服务器 {}", label, server.address());
        Ok(Self {
            label: label.to_string(),
            conn,
        })
    }

    fn query<T: redis::FromRedisValue>(&mut self, cmd: &redis::Cmd, name: &str) -> StoreResult<T> {
        cmd.query(&mut self.conn).map_err(|e| {
            debug!("{}: {} 失败: {}", self.label, name, e);
            StoreError::from(e)
        })
    }
}

impl KeyspaceOperations for RedisStore {
    fn db_size(&mut self) -> StoreResult<u64> {
        self.query(&redis::cmd("DBSIZE"), "DBSIZE")
    }

    fn key_type(&mut self, key: &str) -> StoreResult<KeyType> {
        let name: String = self.query(redis::cmd("TYPE").arg(key), "TYPE")?;
        Ok(KeyType::parse(&name))
    }

    fn ttl(&mut self, key: &str) -> StoreResult<i64> {
        self.query(redis::cmd("TTL").arg(key), "TTL")
    }

    fn scan(&mut self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage<String>> {
        let mut cmd = redis::cmd("SCAN");
        cmd.arg(cursor).arg("MATCH").arg(pattern);
        if count > 0 {
            cmd.arg("COUNT").arg(count);
        }
        let (next, keys): (u64, Vec<String>) = self.query(&cmd, "SCAN")?;
        Ok(ScanPage::new(next, keys))
    }

    fn delete(&mut self, key: &str) -> StoreResult<bool> {
        let removed: u64 = self.query(redis::cmd("DEL").arg(key), "DEL")?;
        Ok(removed > 0)
    }

    fn expire(&mut self, key: &str, seconds: u64) -> StoreResult<bool> {
        let applied: i64 = self.query(redis::cmd("EXPIRE").arg(key).arg(seconds), "EXPIRE")?;
        Ok(applied == 1)
    }
}

impl StringOperations for RedisStore {
    fn get(&mut self, key: &str) -> StoreResult<Option<String>> {
        self.query(redis::cmd("GET").arg(key), "GET")
    }

    fn set(&mut self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value);
        if let Some(ttl) = ttl {
            cmd.arg("EX").arg(ttl.as_secs());
        }
        self.query(&cmd, "SET")
    }
}

impl HashOperations for RedisStore {
    fn hlen(&mut self, key: &str) -> StoreResult<u64> {
        self.query(redis::cmd("HLEN").arg(key), "HLEN")
    }

    fn hscan(&mut self, key: &str, cursor: u64, count: usize) -> StoreResult<ScanPage<FieldValue>> {
        let mut cmd = redis::cmd("HSCAN");
        cmd.arg(key).arg(cursor);
        if count > 0 {
            cmd.arg("COUNT").arg(count);
        }
        let (next, flat): (u64, Vec<String>) = self.query(&cmd, "HSCAN")?;
        Ok(ScanPage::new(next, FieldValue::pairs_for_key(key, flat)?))
    }

    fn hset_many(&mut self, key: &str, pairs: &[FieldValue]) -> StoreResult<()> {
        let mut cmd = redis::cmd("HSET");
        cmd.arg(key);
        for pair in pairs {
            cmd.arg(&pair.field).arg(&pair.value);
        }
        self.query(&cmd, "HSET")
    }
}

impl ListOperations for RedisStore {
    fn llen(&mut self, key: &str) -> StoreResult<u64> {
        self.query(redis::cmd("LLEN").arg(key), "LLEN")
    }

    fn lrange(&mut self, key: &str, start: i64, stop: i64) -> StoreResult<Vec<String>> {
        self.query(redis::cmd("LRANGE").arg(key).arg(start).arg(stop), "LRANGE")
    }

    fn rpush_many(&mut self, key: &str, elements: &[String]) -> StoreResult<u64> {
        self.query(redis::cmd("RPUSH").arg(key).arg(elements), "RPUSH")
    }
}
