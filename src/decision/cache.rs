//! Decision memoization.
//!
//! Optional, off by default. Caches lookup outcomes per (host, path) for a
//! bounded lifetime. `Unavailable` is never stored: an outage must keep
//! falling open on every request, not get pinned for a TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::decision::client::Outcome;
use crate::decision::key::LookupKey;

struct CachedDecision {
    outcome: Outcome,
    stored_at: Instant,
}

/// A thread-safe TTL cache of decision outcomes.
#[derive(Clone)]
pub struct DecisionCache {
    entries: Arc<DashMap<LookupKey, CachedDecision>>,
    ttl: Duration,
}

impl DecisionCache {
    /// Create an empty cache with the given entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    /// Fresh outcome for `key`, if one is cached. Expired entries are
    /// removed on the way out.
    pub fn get(&self, key: &LookupKey) -> Option<Outcome> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.outcome.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        None
    }

    /// Store an outcome. `Unavailable` is dropped silently.
    pub fn insert(&self, key: LookupKey, outcome: &Outcome) {
        if matches!(outcome, Outcome::Unavailable) {
            return;
        }
        self.entries.insert(
            key,
            CachedDecision {
                outcome: outcome.clone(),
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry.
    pub fn sweep(&self) {
        self.entries
            .retain(|_, entry| entry.stored_at.elapsed() < self.ttl);
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
