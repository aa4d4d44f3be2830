//! Diagnosis cache.
//!
//! - [`key`] derives the deterministic [`CacheKey`] from request inputs.
//! - [`store`] defines the [`CacheStore`] seam the gateway reads and writes
//!   through, plus [`MemoryCacheStore`], a bounded in-process backing table.
//!
//! Lookups are always scoped by `(cache_key, requester_id)`: identical
//! inputs from two requesters never share an entry.

pub mod key;
pub mod store;

pub use key::{CacheKey, build_key};
pub use store::{CacheConfig, CacheEntry, CacheStore, MemoryCacheStore};
