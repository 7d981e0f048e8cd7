// Cache store for answers keyed by credential and question.
// Handles TTL checking and process-lifetime in-memory storage.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Default TTL for cached answers: 1 hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Identity of a question for caching purposes.
///
/// Question text is compared byte-for-byte: no case folding, no whitespace
/// normalization.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    api_key: String,
    question: String,
}

impl CacheKey {
    pub fn new(api_key: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            question: question.into(),
        }
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheKey")
            .field("api_key", &"[REDACTED]")
            .field("question", &self.question)
            .finish()
    }
}

/// A stored answer with the time it was cached.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The answer text.
    pub answer: String,
    /// When the answer was cached.
    pub cached_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(answer: String, cached_at: DateTime<Utc>) -> Self {
        Self { answer, cached_at }
    }

    /// Check if this entry is older than `ttl` at `now`.
    ///
    /// An entry exactly `ttl` old is still valid, as is one stamped in the
    /// future (clock went backwards). A `ttl` beyond chrono's range never
    /// expires.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return false;
        };

        now.signed_duration_since(self.cached_at) > ttl
    }

    pub fn is_valid(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        !self.is_expired(now, ttl)
    }
}

/// Process-wide answer cache.
///
/// All operations are total. The map is behind a mutex so concurrent callers
/// cannot corrupt it, but lookups and inserts are not coordinated: two
/// callers missing on the same key will both populate it.
#[derive(Debug)]
pub struct AnswerCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl AnswerCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a fresh answer. An expired entry is dropped and reported as absent.
    pub fn get(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.lock();
        let expired = entries.get(key).map(|entry| entry.is_expired(now, self.ttl))?;
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|entry| entry.answer.clone())
    }

    /// Store an answer, replacing whatever was there.
    pub fn insert(&self, key: CacheKey, answer: String, now: DateTime<Utc>) {
        self.lock().insert(key, CacheEntry::new(answer, now));
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid(now, self.ttl));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-written:
    // every mutation is a single HashMap call.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AnswerCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
