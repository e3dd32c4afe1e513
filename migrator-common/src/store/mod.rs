mod error;
mod data_types;
mod expiry;
mod traits;
mod pattern;
mod memory;
mod redis_store;

pub use error::{StoreError, StoreResult};
pub use data_types::{DataType, FieldValue, KeyType, ScanPage};
pub use traits::{
    KeyspaceOperations, StringOperations, HashOperations,
    ListOperations, StoreClient
};
pub use pattern::glob_match;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
