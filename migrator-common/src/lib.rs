pub mod store;
pub mod config;
pub mod migration;
pub mod logger;

// 重新导出一些常用的类型，使其他crate更容易使用
pub use store::{MemoryStore, RedisStore, StoreClient, StoreError};
pub use migration::{MigrationError, MigrationSummary, Migrator};
pub use config::Settings;
