//! Caching primitives for entry arguments
//!
//! Holds the arguments a node returned after a publish, so the next
//! operation on the same document can be signed without asking again.

mod argument_cache;

pub use argument_cache::{ArgumentCache, CacheKey, CacheStatsSnapshot};
