//! Single-movie lookups.
//!
//! Tracks the movie shown on the detail screen and keeps recently fetched
//! records in an id-keyed cache with a time-to-live, which the favourites
//! screen also reads from.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use super::data::MovieDetail;
use crate::omdb::Failure;

/// Default lifetime of a cached lookup
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// What the detail screen should show
#[derive(Debug, Clone, PartialEq)]
pub enum DetailStatus {
    Idle,
    Loading,
    Loaded(MovieDetail),
    /// User-facing error text
    Failed(String),
}

#[derive(Debug, Clone)]
struct CachedDetail {
    detail: MovieDetail,
    fetched_at: Instant,
}

#[derive(Debug, Clone)]
pub struct DetailFetcher {
    ttl: Duration,
    /// Id on the detail screen
    active: Option<String>,
    status: DetailStatus,
    cache: HashMap<String, CachedDetail>,
    /// Ids with a lookup outstanding
    pending: HashSet<String>,
    /// Last failure per id, for the favourites cards
    failures: HashMap<String, String>,
}

impl Default for DetailFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl DetailFetcher {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            active: None,
            status: DetailStatus::Idle,
            cache: HashMap::new(),
            pending: HashSet::new(),
            failures: HashMap::new(),
        }
    }

    /// Show `id` on the detail screen.
    /// Returns the id to fetch, or `None` if the cache or an outstanding
    /// lookup already covers it.
    pub fn open(&mut self, id: &str, now: Instant) -> Option<String> {
        self.active = Some(id.to_string());

        if let Some(detail) = self.fresh(id, now) {
            self.status = DetailStatus::Loaded(detail.clone());
            return None;
        }

        self.status = DetailStatus::Loading;
        self.lookup(id, now)
    }

    /// Leave the detail screen
    pub fn close(&mut self) {
        self.active = None;
        self.status = DetailStatus::Idle;
        self.failures.clear();
    }

    /// Make sure `id` is cached without touching the detail screen.
    /// Returns the id to fetch when a request is needed.
    pub fn lookup(&mut self, id: &str, now: Instant) -> Option<String> {
        if self.fresh(id, now).is_some() || self.pending.contains(id) {
            return None;
        }
        self.failures.remove(id);
        self.pending.insert(id.to_string());
        Some(id.to_string())
    }

    /// Record the outcome of a lookup for `id`
    pub fn apply(&mut self, id: &str, result: Result<MovieDetail, Failure>, now: Instant) {
        self.pending.remove(id);
        let is_active = self.active.as_deref() == Some(id);

        match result {
            Ok(detail) => {
                if is_active {
                    self.status = DetailStatus::Loaded(detail.clone());
                }
                self.cache.insert(
                    id.to_string(),
                    CachedDetail {
                        detail,
                        fetched_at: now,
                    },
                );
            }
            Err(failure) => {
                let message = failure.user_message().to_string();
                if is_active {
                    self.status = DetailStatus::Failed(message.clone());
                }
                self.failures.insert(id.to_string(), message);
            }
        }
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    /// Cached record regardless of age
    pub fn cached(&self, id: &str) -> Option<&MovieDetail> {
        self.cache.get(id).map(|entry| &entry.detail)
    }

    pub fn failure(&self, id: &str) -> Option<&str> {
        self.failures.get(id).map(String::as_str)
    }

    /// Drop entries older than the TTL
    pub fn evict_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.cache
            .retain(|_, entry| now.saturating_duration_since(entry.fetched_at) < ttl);
    }

    fn fresh(&self, id: &str, now: Instant) -> Option<&MovieDetail> {
        self.cache
            .get(id)
            .filter(|entry| now.saturating_duration_since(entry.fetched_at) < self.ttl)
            .map(|entry| &entry.detail)
    }
}
