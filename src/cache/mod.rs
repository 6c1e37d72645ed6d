// Local key-value persistence.
// Backs the UI state store; everything else the dashboard caches lives in memory.

pub mod paths;
pub mod store;

pub use paths::{cache_dir, key_path};
pub use store::{FileStorage, KeyValueStorage, MemoryStorage};
