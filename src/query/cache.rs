// In-memory query cache.
// Entries carry their fetch time for staleness and their last access for garbage collection.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Identity of a cached query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    OrgDetails { org: String },
    OrgRepos { org: String },
    Languages { org: String, repo_ids: String },
}

impl QueryKey {
    pub fn org(&self) -> &str {
        match self {
            QueryKey::OrgDetails { org }
            | QueryKey::OrgRepos { org }
            | QueryKey::Languages { org, .. } => org,
        }
    }
}

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub data: T,
    /// When the data was last fetched from GitHub.
    pub fetched_at: DateTime<Utc>,
    /// When any consumer last read or wrote the entry.
    pub last_accessed: DateTime<Utc>,
}

/// Time since `since`. A clock that moved backwards counts as infinitely old.
fn elapsed(since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    now.signed_duration_since(since)
        .to_std()
        .unwrap_or(Duration::MAX)
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, now: DateTime<Utc>) -> Self {
        Self {
            data,
            fetched_at: now,
            last_accessed: now,
        }
    }

    pub fn is_stale(&self, now: DateTime<Utc>, stale_time: Duration) -> bool {
        elapsed(self.fetched_at, now) >= stale_time
    }

    pub fn is_collectable(&self, now: DateTime<Utc>, gc_time: Duration) -> bool {
        elapsed(self.last_accessed, now) >= gc_time
    }
}

#[derive(Debug)]
pub struct QueryCache<T> {
    entries: HashMap<QueryKey, CacheEntry<T>>,
    stale_time: Duration,
    gc_time: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(stale_time: Duration, gc_time: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_time,
            gc_time,
        }
    }

    /// The entry for `key`, touched at `now`. An entry idle past the GC window
    /// is dropped on the spot, so the caller starts over with a full fetch.
    fn live_entry(
        &mut self,
        key: &QueryKey,
        now: DateTime<Utc>,
    ) -> Option<&mut CacheEntry<T>> {
        if self.entries.get(key)?.is_collectable(now, self.gc_time) {
            self.entries.remove(key);
            return None;
        }
        let entry = self.entries.get_mut(key)?;
        entry.last_accessed = now;
        Some(entry)
    }

    /// Cached data if it is still inside the stale window.
    pub fn get_fresh(&mut self, key: &QueryKey, now: DateTime<Utc>) -> Option<T> {
        let stale_time = self.stale_time;
        let entry = self.live_entry(key, now)?;
        if entry.is_stale(now, stale_time) {
            return None;
        }
        Some(entry.data.clone())
    }

    /// Cached data regardless of staleness.
    pub fn get_any(&mut self, key: &QueryKey, now: DateTime<Utc>) -> Option<T> {
        self.live_entry(key, now).map(|entry| entry.data.clone())
    }

    /// Mutable access without refreshing the fetch time.
    pub fn get_mut(&mut self, key: &QueryKey, now: DateTime<Utc>) -> Option<&mut T> {
        self.live_entry(key, now).map(|entry| &mut entry.data)
    }

    pub fn insert(&mut self, key: QueryKey, data: T, now: DateTime<Utc>) {
        self.entries.insert(key, CacheEntry::new(data, now));
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove_org(&mut self, org: &str) {
        self.entries.retain(|key, _| key.org() != org);
    }

    /// Evict entries idle for longer than the GC window. Returns how many were dropped.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let gc_time = self.gc_time;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_collectable(now, gc_time));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
