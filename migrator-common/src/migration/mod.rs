mod cursor;
mod driver;
mod error;
mod expiration;
mod hash_copy;
mod list_copy;
mod orchestrator;
mod progress;
mod report;
mod string_copy;
mod tally;

pub use cursor::{CursorScan, ScanState};
pub use driver::MigrationDriver;
pub use error::{MigrationError, MigrationResult};
pub use hash_copy::HashCopier;
pub use list_copy::{page_ranges, ListCopier};
pub use orchestrator::Migrator;
pub use progress::Progress;
pub use report::{read_report, write_report, MigrationStatus, MigrationSummary};
pub use string_copy::StringCopier;
pub use tally::{normalize_ttl, CopyOutcome, KeyRecord, MigrationTally};
