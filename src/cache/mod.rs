// Cache module for memoized answers.
// In-memory TTL store plus the clock it measures expiry against.

#![allow(dead_code, unused_imports)]

pub mod clock;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use store::{AnswerCache, CacheEntry, CacheKey, DEFAULT_TTL};
