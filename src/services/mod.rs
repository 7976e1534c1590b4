// Service exports
pub mod cache;
pub mod debounce;
pub mod snapshot;

pub use cache::{CacheKey, CacheStats, ResultCache};
pub use debounce::SearchDebouncer;
pub use snapshot::{evaluate_snapshot, evaluate_snapshot_cached, load_snapshot, parse_snapshot, SnapshotError};
