// Cached query coordinator.
// Answers questions through the completion client, memoizing successes.

use std::time::Duration;

use tracing::{debug, error};

use crate::cache::{AnswerCache, CacheKey, Clock, SystemClock};
use crate::diagnostics::DiagnosticsSink;
use crate::groq::CompletionClient;

/// Shown to the user whenever an answer could not be fetched.
pub const FAILURE_MESSAGE: &str = "Sorry, an error occurred while fetching the answer.";

/// Front door for answering questions.
///
/// Successful answers are cached per (API key, question) for the cache TTL.
/// Failures are logged and never cached.
pub struct QueryCoordinator<C, K = SystemClock> {
    client: C,
    cache: AnswerCache,
    sink: DiagnosticsSink,
    clock: K,
}

impl<C: CompletionClient> QueryCoordinator<C> {
    pub fn new(client: C, ttl: Duration, sink: DiagnosticsSink) -> Self {
        Self::with_clock(client, ttl, sink, SystemClock)
    }
}

impl<C: CompletionClient, K: Clock> QueryCoordinator<C, K> {
    pub fn with_clock(client: C, ttl: Duration, sink: DiagnosticsSink, clock: K) -> Self {
        Self {
            client,
            cache: AnswerCache::new(ttl),
            sink,
            clock,
        }
    }

    /// Answer `question`, from cache when possible.
    ///
    /// Always returns display-ready text; on failure that is [`FAILURE_MESSAGE`].
    pub async fn answer(&self, api_key: &str, question: &str) -> String {
        let key = CacheKey::new(api_key, question);

        if let Some(answer) = self.cache.get(&key, self.clock.now()) {
            debug!(question_len = question.len(), "answer cache hit");
            return answer;
        }

        debug!(question_len = question.len(), "answer cache miss");
        match self.client.complete(api_key, question).await {
            Ok(answer) => {
                self.cache.insert(key, answer.clone(), self.clock.now());
                answer
            }
            Err(e) => {
                error!(error = %e, "completion request failed");
                self.sink.error(format!("Error in Groq API call: {}", e));
                FAILURE_MESSAGE.to_string()
            }
        }
    }

    /// Number of stored entries, fresh or not yet purged.
    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Drop expired entries. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.cache.purge_expired(self.clock.now())
    }

    pub fn sink(&self) -> &DiagnosticsSink {
        &self.sink
    }
}
