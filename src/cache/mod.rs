//! Cache module for memoizing forecast fetches
//!
//! This module provides an in-memory, process-lifetime cache that bounds
//! the upstream request rate with a time-to-live per entry. Expired
//! entries are refreshed lazily on the next read, and a failed refresh
//! keeps the previous bundle around so the application can degrade
//! gracefully when the API is unavailable.

mod store;

pub use store::{CacheKey, ForecastCache, DEFAULT_TTL_SECS};
